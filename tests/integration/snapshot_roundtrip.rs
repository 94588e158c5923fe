//! Snapshot then checkout reproduces the original files

use snaptree::checkout::Reconciler;
use snaptree::ignore::IgnorePolicy;
use snaptree::store::{FileObjectStore, MemoryObjectStore, ObjectStore};
use snaptree::tree::hasher::compute_object_id;
use snaptree::tree::{TreeBuilder, TreeFlattener};
use snaptree::types::ObjectKind;
use std::collections::BTreeMap;
use tempfile::TempDir;

use super::test_utils::{read_files, write_files};

fn roundtrip<S: ObjectStore>(store: &S) {
    let source = TempDir::new().unwrap();
    write_files(
        source.path(),
        &[
            ("README.md", b"# readme\n"),
            ("src/lib.rs", b"pub fn f() {}\n"),
            ("src/bin/main.rs", b"fn main() {}\n"),
            ("assets/logo.bin", &[0u8, 159, 146, 150, 255]),
            ("empty.txt", b""),
            ("name with spaces.txt", b"spaces"),
        ],
    );

    let ignore = IgnorePolicy::new();
    let oid = TreeBuilder::new(store, &ignore).write_tree(source.path()).unwrap();

    let target = TempDir::new().unwrap();
    Reconciler::new(store, &ignore, target.path())
        .read_tree(&oid)
        .unwrap();

    assert_eq!(
        read_files(target.path(), &ignore),
        read_files(source.path(), &ignore)
    );
}

#[test]
fn test_roundtrip_memory_store() {
    roundtrip(&MemoryObjectStore::new());
}

#[test]
fn test_roundtrip_file_store() {
    let objects = TempDir::new().unwrap();
    roundtrip(&FileObjectStore::new(objects.path()).unwrap());
}

/// Root with a.txt="hello" and sub/b.txt="world"
#[test]
fn test_flatten_correctness() {
    let temp_dir = TempDir::new().unwrap();
    write_files(temp_dir.path(), &[("a.txt", b"hello"), ("sub/b.txt", b"world")]);

    let store = MemoryObjectStore::new();
    let ignore = IgnorePolicy::new();
    let oid = TreeBuilder::new(&store, &ignore)
        .write_tree(temp_dir.path())
        .unwrap();

    let map = TreeFlattener::new(&store).get_tree(Some(&oid), "").unwrap();
    let expected: BTreeMap<String, _> = [
        ("a.txt".to_string(), compute_object_id(ObjectKind::Blob, b"hello")),
        ("sub/b.txt".to_string(), compute_object_id(ObjectKind::Blob, b"world")),
    ]
    .into_iter()
    .collect();
    assert_eq!(map.into_inner(), expected);
}

/// Snapshotting the checked-out directory gives back the same oid
#[test]
fn test_checkout_then_snapshot_is_stable() {
    let source = TempDir::new().unwrap();
    write_files(source.path(), &[("x/y/z.txt", b"z"), ("top.txt", b"t")]);

    let store = MemoryObjectStore::new();
    let ignore = IgnorePolicy::new();
    let builder = TreeBuilder::new(&store, &ignore);
    let oid = builder.write_tree(source.path()).unwrap();

    let target = TempDir::new().unwrap();
    write_files(target.path(), &[("stale/old.txt", b"old"), ("top.txt", b"different")]);
    Reconciler::new(&store, &ignore, target.path())
        .read_tree(&oid)
        .unwrap();

    assert_eq!(builder.write_tree(target.path()).unwrap(), oid);
    assert!(!target.path().join("stale").exists());
}
