//! Corrupt or incomplete stores are detected, never silently materialized

use snaptree::checkout::Reconciler;
use snaptree::error::{StorageError, TreeError};
use snaptree::ignore::IgnorePolicy;
use snaptree::store::{FileObjectStore, MemoryObjectStore, ObjectStore};
use snaptree::tree::hasher::compute_object_id;
use snaptree::tree::{TreeBuilder, TreeFlattener};
use snaptree::types::ObjectKind;
use std::fs;
use tempfile::TempDir;

fn flatten_payload(payload: &str) -> Result<usize, TreeError> {
    let store = MemoryObjectStore::new();
    let tree = store.hash_object(payload.as_bytes(), ObjectKind::Tree).unwrap();
    TreeFlattener::new(&store)
        .get_tree(Some(&tree), "")
        .map(|map| map.len())
}

#[test]
fn test_unknown_kind_token() {
    let blob = compute_object_id(ObjectKind::Blob, b"x");
    match flatten_payload(&format!("commit {} x\n", blob)) {
        Err(TreeError::UnknownEntryKind { line, kind, .. }) => {
            assert_eq!(line, 1);
            assert_eq!(kind, "commit");
        }
        other => panic!("expected UnknownEntryKind, got {:?}", other),
    }
}

#[test]
fn test_malformed_entries() {
    let store = MemoryObjectStore::new();
    let blob = store.hash_object(b"x", ObjectKind::Blob).unwrap();

    let cases = [
        format!("blob {} ..\n", blob),
        format!("blob {} .\n", blob),
        format!("blob {} a/b\n", blob),
        format!("blob {}\n", blob),
        format!("blob {} \n", blob),
        "blob nothex name\n".to_string(),
        format!("blob {} name\n", blob.to_hex().to_uppercase()),
    ];

    for payload in cases {
        let tree = store.hash_object(payload.as_bytes(), ObjectKind::Tree).unwrap();
        let result = TreeFlattener::new(&store).get_tree(Some(&tree), "");
        assert!(
            matches!(result, Err(TreeError::CorruptTreeEntry { .. })),
            "payload {:?} gave {:?}",
            payload,
            result
        );
    }
}

#[test]
fn test_corrupt_entry_reports_line_number() {
    let blob = compute_object_id(ObjectKind::Blob, b"x");
    let payload = format!("blob {} a\nblob {} ..\n", blob, blob);
    match flatten_payload(&payload) {
        Err(TreeError::CorruptTreeEntry { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected CorruptTreeEntry, got {:?}", other),
    }
}

#[test]
fn test_entry_pointing_at_wrong_kind() {
    let store = MemoryObjectStore::new();
    let blob = store.hash_object(b"really a blob", ObjectKind::Blob).unwrap();
    let payload = format!("tree {} fake_dir\n", blob);
    let tree = store.hash_object(payload.as_bytes(), ObjectKind::Tree).unwrap();

    assert!(matches!(
        TreeFlattener::new(&store).get_tree(Some(&tree), ""),
        Err(TreeError::Storage(StorageError::TypeMismatch {
            expected: ObjectKind::Tree,
            actual: ObjectKind::Blob,
            ..
        }))
    ));
}

#[test]
fn test_tampered_object_file_detected_before_clear() {
    let source = TempDir::new().unwrap();
    fs::write(source.path().join("data.txt"), "original").unwrap();

    let objects = TempDir::new().unwrap();
    let store = FileObjectStore::new(objects.path()).unwrap();
    let ignore = IgnorePolicy::new();
    let tree = TreeBuilder::new(&store, &ignore)
        .write_tree(source.path())
        .unwrap();

    // Overwrite the tree object with a different, well-formed envelope
    let hex = tree.to_hex();
    let object_path = objects.path().join(&hex[..2]).join(&hex);
    let other = snaptree::store::StoredObject::new(ObjectKind::Tree, b"");
    fs::write(&object_path, other.encode().unwrap()).unwrap();

    let work = TempDir::new().unwrap();
    fs::write(work.path().join("precious.txt"), "keep").unwrap();

    let result = Reconciler::new(&store, &ignore, work.path()).read_tree(&tree);
    assert!(matches!(
        result,
        Err(TreeError::Storage(StorageError::HashMismatch { .. }))
    ));
    assert!(work.path().join("precious.txt").exists());
}

#[test]
fn test_missing_blob_detected_before_clear() {
    let source = TempDir::new().unwrap();
    fs::write(source.path().join("data.txt"), "will vanish").unwrap();

    let objects = TempDir::new().unwrap();
    let store = FileObjectStore::new(objects.path()).unwrap();
    let ignore = IgnorePolicy::new();
    let tree = TreeBuilder::new(&store, &ignore)
        .write_tree(source.path())
        .unwrap();

    let blob = compute_object_id(ObjectKind::Blob, b"will vanish");
    let hex = blob.to_hex();
    fs::remove_file(objects.path().join(&hex[..2]).join(&hex)).unwrap();

    let work = TempDir::new().unwrap();
    fs::write(work.path().join("precious.txt"), "keep").unwrap();

    match Reconciler::new(&store, &ignore, work.path()).read_tree(&tree) {
        Err(TreeError::Storage(StorageError::MissingObject(oid))) => assert_eq!(oid, blob),
        other => panic!("expected MissingObject, got {:?}", other),
    }
    assert!(work.path().join("precious.txt").exists());
}

#[test]
fn test_tampered_blob_file_detected_before_clear() {
    let source = TempDir::new().unwrap();
    fs::write(source.path().join("data.txt"), "original").unwrap();

    let objects = TempDir::new().unwrap();
    let store = FileObjectStore::new(objects.path()).unwrap();
    let ignore = IgnorePolicy::new();
    let tree = TreeBuilder::new(&store, &ignore)
        .write_tree(source.path())
        .unwrap();

    // Swap the blob's content for a well-formed envelope of other bytes
    let blob = compute_object_id(ObjectKind::Blob, b"original");
    let hex = blob.to_hex();
    let other = snaptree::store::StoredObject::new(ObjectKind::Blob, b"forged");
    fs::write(
        objects.path().join(&hex[..2]).join(&hex),
        other.encode().unwrap(),
    )
    .unwrap();

    let work = TempDir::new().unwrap();
    fs::write(work.path().join("precious.txt"), "keep").unwrap();

    let result = Reconciler::new(&store, &ignore, work.path()).read_tree(&tree);
    assert!(matches!(
        result,
        Err(TreeError::Storage(StorageError::HashMismatch { expected, .. })) if expected == blob
    ));
    assert!(work.path().join("precious.txt").exists());
    assert!(!work.path().join("data.txt").exists());
}

#[test]
fn test_name_reused_as_file_and_directory_detected_before_clear() {
    let store = MemoryObjectStore::new();
    let x = store.hash_object(b"x", ObjectKind::Blob).unwrap();
    let z = store.hash_object(b"z", ObjectKind::Blob).unwrap();
    let inner = store
        .hash_object(format!("blob {} b\n", z).as_bytes(), ObjectKind::Tree)
        .unwrap();
    let other = store
        .hash_object(format!("blob {} c\n", z).as_bytes(), ObjectKind::Tree)
        .unwrap();

    for payload in [
        format!("blob {} a\ntree {} a\n", x, inner),
        format!("tree {} a\ntree {} a\n", inner, other),
    ] {
        let tree = store.hash_object(payload.as_bytes(), ObjectKind::Tree).unwrap();
        let work = TempDir::new().unwrap();
        fs::write(work.path().join("precious.txt"), "keep").unwrap();

        let ignore = IgnorePolicy::new();
        let result = Reconciler::new(&store, &ignore, work.path()).read_tree(&tree);
        assert!(
            matches!(result, Err(TreeError::CorruptTreeEntry { line: 2, .. })),
            "payload {:?} gave {:?}",
            payload,
            result
        );
        assert!(work.path().join("precious.txt").exists());
    }
}
