//! Tree flattening: stored tree graph to a flat path map

use crate::error::TreeError;
use crate::store::ObjectStore;
use crate::tree::entry;
use crate::tree::path::join_wire_path;
use crate::types::{ObjectKind, Oid};
use std::collections::btree_map::{self, BTreeMap};
use tracing::{debug, instrument, trace};

/// Flat mapping from `/`-joined relative path to blob oid.
///
/// Keys are unique and no key is a directory prefix of another: a path that
/// is both a file and a directory, or a path inserted twice, is reported as a
/// collision instead of silently replacing or shadowing the earlier blob.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathMap {
    entries: BTreeMap<String, Oid>,
}

impl PathMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: String, oid: Oid) -> Result<(), TreeError> {
        if let Some(existing) = self.conflicting_key(&path) {
            return Err(TreeError::PathCollision {
                path: existing.to_string(),
            });
        }
        self.entries.insert(path, oid);
        Ok(())
    }

    /// The existing key equal to `path`, above it, or below it.
    fn conflicting_key(&self, path: &str) -> Option<&str> {
        if let Some((existing, _)) = self.entries.get_key_value(path) {
            return Some(existing);
        }

        for (index, _) in path.match_indices('/') {
            if let Some((existing, _)) = self.entries.get_key_value(&path[..index]) {
                return Some(existing);
            }
        }

        let dir = format!("{}/", path);
        self.entries
            .range(dir.clone()..)
            .next()
            .map(|(existing, _)| existing.as_str())
            .filter(|existing| existing.starts_with(&dir))
    }

    /// Move every entry of `child` into `self`, failing on the first shared key.
    pub fn merge(&mut self, child: PathMap) -> Result<(), TreeError> {
        for (path, oid) in child.entries {
            self.insert(path, oid)?;
        }
        Ok(())
    }

    pub fn get(&self, path: &str) -> Option<&Oid> {
        self.entries.get(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Oid)> {
        self.entries.iter().map(|(path, oid)| (path.as_str(), oid))
    }

    pub fn into_inner(self) -> BTreeMap<String, Oid> {
        self.entries
    }
}

impl IntoIterator for PathMap {
    type Item = (String, Oid);
    type IntoIter = btree_map::IntoIter<String, Oid>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Walks stored trees and collects every reachable blob.
pub struct TreeFlattener<'a, S: ObjectStore + ?Sized> {
    store: &'a S,
    max_depth: Option<usize>,
}

impl<'a, S: ObjectStore + ?Sized> TreeFlattener<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            max_depth: None,
        }
    }

    pub fn with_max_depth(mut self, limit: Option<usize>) -> Self {
        self.max_depth = limit;
        self
    }

    /// Flatten tree `oid` with every key prefixed by `base_path`.
    ///
    /// `None` stands for "no tree" and yields an empty map.
    #[instrument(skip(self))]
    pub fn get_tree(&self, oid: Option<&Oid>, base_path: &str) -> Result<PathMap, TreeError> {
        let map = match oid {
            Some(oid) => self.flatten(oid, base_path)?,
            None => PathMap::new(),
        };
        debug!(paths = map.len(), "Flattened tree");
        Ok(map)
    }

    /// Depth-first over an explicit work list, so stored graph depth never
    /// translates into call stack depth.
    fn flatten(&self, root: &Oid, base_path: &str) -> Result<PathMap, TreeError> {
        let mut result = PathMap::new();
        let mut pending = vec![(*root, base_path.to_string(), 0usize)];

        while let Some((oid, prefix, depth)) = pending.pop() {
            if let Some(limit) = self.max_depth {
                if depth > limit {
                    return Err(TreeError::DepthExceeded {
                        path: prefix,
                        limit,
                    });
                }
            }

            let payload = self.store.get_object(&oid, Some(ObjectKind::Tree))?;
            for entry in entry::parse_entries(&oid, &payload)? {
                let path = join_wire_path(&prefix, &entry.name);
                match entry.kind {
                    ObjectKind::Blob => {
                        trace!(path = %path, blob = %entry.oid, "Blob entry");
                        result.insert(path, entry.oid)?;
                    }
                    ObjectKind::Tree => pending.push((entry.oid, format!("{}/", path), depth + 1)),
                }
            }
        }

        Ok(result)
    }
}
