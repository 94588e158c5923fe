//! Property-based snapshot/checkout round trip

use proptest::prelude::*;
use snaptree::checkout::Reconciler;
use snaptree::ignore::IgnorePolicy;
use snaptree::store::MemoryObjectStore;
use snaptree::tree::{TreeBuilder, TreeFlattener};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use walkdir::WalkDir;

fn file_set() -> impl Strategy<Value = BTreeMap<String, Vec<u8>>> {
    prop::collection::btree_map(
        "[a-d]{1,4}(/[a-d]{1,4}){0,3}\\.(txt|bin)",
        prop::collection::vec(any::<u8>(), 0..128),
        0..16,
    )
}

fn read_back(root: &Path) -> BTreeMap<String, Vec<u8>> {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(Result::unwrap)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap();
            let key = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            (key, fs::read(e.path()).unwrap())
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// read_tree(write_tree(D)) into an empty directory reproduces D
    #[test]
    fn checkout_reproduces_snapshot(files in file_set()) {
        let source = TempDir::new().unwrap();
        for (path, content) in &files {
            let target = source.path().join(path.as_str());
            fs::create_dir_all(target.parent().unwrap()).unwrap();
            fs::write(target, content).unwrap();
        }
        // Directory segments never carry an extension, so no generated
        // path is both a file and a directory.
        let expected = read_back(source.path());

        let store = MemoryObjectStore::new();
        let ignore = IgnorePolicy::new();
        let oid = TreeBuilder::new(&store, &ignore).write_tree(source.path()).unwrap();

        let flat = TreeFlattener::new(&store).get_tree(Some(&oid), "").unwrap();
        prop_assert_eq!(flat.len(), expected.len());

        let target = TempDir::new().unwrap();
        Reconciler::new(&store, &ignore, target.path()).read_tree(&oid).unwrap();
        prop_assert_eq!(read_back(target.path()), expected);
    }
}
