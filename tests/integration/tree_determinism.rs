//! Integration tests for tree building determinism

use snaptree::ignore::IgnorePolicy;
use snaptree::store::{MemoryObjectStore, ObjectStore};
use snaptree::tree::hasher::{compute_object_id, empty_tree_id};
use snaptree::tree::TreeBuilder;
use snaptree::types::ObjectKind;
use std::fs;
use tempfile::TempDir;

use super::test_utils::write_files;

/// Test that the same filesystem produces the same root oid
#[test]
fn test_same_filesystem_same_root() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write_files(
        root,
        &[
            ("file1.txt", b"content1"),
            ("file2.txt", b"content2"),
            ("dir1/file3.txt", b"content3"),
        ],
    );

    let store = MemoryObjectStore::new();
    let ignore = IgnorePolicy::new();
    let builder = TreeBuilder::new(&store, &ignore);

    assert_eq!(builder.write_tree(root).unwrap(), builder.write_tree(root).unwrap());
}

/// Test that creation order does not leak into the oid
#[test]
fn test_creation_order_independent() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let files: [(&str, &[u8]); 4] = [
        ("b.txt", b"b"),
        ("a.txt", b"a"),
        ("z/inner.txt", b"z"),
        ("m/n/o.txt", b"deep"),
    ];
    write_files(first.path(), &files);
    let mut reversed = files;
    reversed.reverse();
    write_files(second.path(), &reversed);

    let store = MemoryObjectStore::new();
    let ignore = IgnorePolicy::new();
    let builder = TreeBuilder::new(&store, &ignore);
    assert_eq!(
        builder.write_tree(first.path()).unwrap(),
        builder.write_tree(second.path()).unwrap()
    );
}

/// Test that the same tree is produced in an independent store
#[test]
fn test_oid_independent_of_store_instance() {
    let temp_dir = TempDir::new().unwrap();
    write_files(temp_dir.path(), &[("a.txt", b"hello"), ("sub/b.txt", b"world")]);

    let ignore = IgnorePolicy::new();
    let a = MemoryObjectStore::new();
    let b = MemoryObjectStore::new();
    assert_eq!(
        TreeBuilder::new(&a, &ignore).write_tree(temp_dir.path()).unwrap(),
        TreeBuilder::new(&b, &ignore).write_tree(temp_dir.path()).unwrap()
    );
}

/// Test that file addition produces a different root oid
#[test]
fn test_file_addition_different_root() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("file1.txt"), "content1").unwrap();

    let store = MemoryObjectStore::new();
    let ignore = IgnorePolicy::new();
    let builder = TreeBuilder::new(&store, &ignore);
    let before = builder.write_tree(root).unwrap();

    fs::write(root.join("file2.txt"), "content2").unwrap();
    assert_ne!(before, builder.write_tree(root).unwrap());
}

/// Renaming a file changes the parent tree even though the blob is shared
#[test]
fn test_rename_changes_root_but_not_blob() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("old.txt"), "same").unwrap();

    let store = MemoryObjectStore::new();
    let ignore = IgnorePolicy::new();
    let builder = TreeBuilder::new(&store, &ignore);
    let before = builder.write_tree(root).unwrap();

    fs::rename(root.join("old.txt"), root.join("new.txt")).unwrap();
    let after = builder.write_tree(root).unwrap();

    assert_ne!(before, after);
    // One blob, two trees
    assert_eq!(store.len(), 3);
}

/// Empty and ignored-only directories share the empty tree oid
#[test]
fn test_empty_tree_stability() {
    let empty = TempDir::new().unwrap();
    let ignored_only = TempDir::new().unwrap();
    write_files(
        ignored_only.path(),
        &[(".snaptree/objects/ab/cd", b"x"), (".snaptree/config.toml", b"")],
    );

    let store = MemoryObjectStore::new();
    let ignore = IgnorePolicy::new();
    let builder = TreeBuilder::new(&store, &ignore);

    let a = builder.write_tree(empty.path()).unwrap();
    let b = builder.write_tree(ignored_only.path()).unwrap();
    assert_eq!(a, empty_tree_id());
    assert_eq!(b, empty_tree_id());
    assert_eq!(store.get_object(&a, Some(ObjectKind::Tree)).unwrap(), b"");
}

/// The wire payload is exactly what the format promises
#[test]
fn test_tree_payload_wire_format() {
    let temp_dir = TempDir::new().unwrap();
    write_files(temp_dir.path(), &[("b.txt", b"B"), ("a.txt", b"A"), ("d/c.txt", b"C")]);

    let store = MemoryObjectStore::new();
    let ignore = IgnorePolicy::new();
    let root = TreeBuilder::new(&store, &ignore)
        .write_tree(temp_dir.path())
        .unwrap();

    let sub_payload = format!("blob {} c.txt\n", compute_object_id(ObjectKind::Blob, b"C"));
    let sub = compute_object_id(ObjectKind::Tree, sub_payload.as_bytes());
    let expected = format!(
        "blob {} a.txt\nblob {} b.txt\ntree {} d\n",
        compute_object_id(ObjectKind::Blob, b"A"),
        compute_object_id(ObjectKind::Blob, b"B"),
        sub
    );

    assert_eq!(
        String::from_utf8(store.get_object(&root, None).unwrap()).unwrap(),
        expected
    );
    assert_eq!(root, compute_object_id(ObjectKind::Tree, expected.as_bytes()));
}
