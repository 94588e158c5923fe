//! End-to-end tests of the snaptree binary

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

use super::test_utils::write_files;

fn snaptree(workspace: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_snaptree"))
        .arg("--workspace")
        .arg(workspace)
        .args(args)
        .env_remove("SNAPTREE_LOG")
        .output()
        .expect("failed to run snaptree")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "snaptree failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_cli_snapshot_and_restore() {
    let temp_dir = TempDir::new().unwrap();
    let ws = temp_dir.path();
    stdout(&snaptree(ws, &["init"]));
    write_files(ws, &[("a.txt", b"hello"), ("sub/b.txt", b"world")]);

    let tree = stdout(&snaptree(ws, &["write-tree"])).trim().to_string();
    assert_eq!(tree.len(), 64);

    let listing = stdout(&snaptree(ws, &["ls-tree", "-r", &tree]));
    let lines: Vec<&str> = listing.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("\ta.txt"));
    assert!(lines[1].ends_with("\tsub/b.txt"));

    fs::remove_file(ws.join("a.txt")).unwrap();
    fs::write(ws.join("junk.txt"), "junk").unwrap();
    stdout(&snaptree(ws, &["read-tree", &tree]));

    assert_eq!(fs::read_to_string(ws.join("a.txt")).unwrap(), "hello");
    assert!(!ws.join("junk.txt").exists());
    assert!(ws.join(".snaptree").join("config.toml").exists());
}

#[test]
fn test_cli_hash_object_and_cat_file() {
    let temp_dir = TempDir::new().unwrap();
    let ws = temp_dir.path();
    stdout(&snaptree(ws, &["init"]));
    fs::write(ws.join("bytes.bin"), [0u8, 1, 2, 255]).unwrap();

    let path = ws.join("bytes.bin");
    let oid = stdout(&snaptree(ws, &["hash-object", path.to_str().unwrap()]))
        .trim()
        .to_string();

    let output = snaptree(ws, &["cat-file", "--kind", "blob", &oid]);
    assert!(output.status.success());
    assert_eq!(output.stdout, vec![0u8, 1, 2, 255]);
}

#[test]
fn test_cli_ls_tree_json() {
    let temp_dir = TempDir::new().unwrap();
    let ws = temp_dir.path();
    stdout(&snaptree(ws, &["init"]));
    write_files(ws, &[("only.txt", b"x")]);
    let tree = stdout(&snaptree(ws, &["write-tree"])).trim().to_string();

    let json: serde_json::Value =
        serde_json::from_str(&stdout(&snaptree(ws, &["ls-tree", "--format", "json", &tree])))
            .unwrap();
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["name"], "only.txt");
    assert_eq!(json[0]["kind"], "blob");
}

#[test]
fn test_cli_errors_exit_nonzero() {
    let temp_dir = TempDir::new().unwrap();
    let ws = temp_dir.path();

    let output = snaptree(ws, &["write-tree"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("snaptree init"));

    stdout(&snaptree(ws, &["init"]));
    let missing = "0".repeat(64);
    let output = snaptree(ws, &["read-tree", &missing]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not found"));

    let output = snaptree(ws, &["init"]);
    assert!(!output.status.success());
}
