//! Tree builder: snapshot a directory into the object store

use crate::error::TreeError;
use crate::ignore::IgnorePolicy;
use crate::store::ObjectStore;
use crate::tree::entry::{self, TreeEntry};
use crate::tree::path;
use crate::tree::walker::{self, Entry};
use crate::types::{ObjectKind, Oid};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, instrument, trace};

/// Counters collected while building one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub blobs: usize,
    pub trees: usize,
    pub bytes: u64,
}

/// Tree builder for snapshotting a directory
///
/// Files become blobs, directories become trees, and each tree payload lists
/// its children in canonical order. Every object is written through the
/// store as it is produced, so a failed build may leave orphan objects
/// behind but never returns a root oid.
pub struct TreeBuilder<'a, S: ObjectStore + ?Sized> {
    store: &'a S,
    ignore: &'a IgnorePolicy,
    max_depth: Option<usize>,
}

impl<'a, S: ObjectStore + ?Sized> TreeBuilder<'a, S> {
    pub fn new(store: &'a S, ignore: &'a IgnorePolicy) -> Self {
        Self {
            store,
            ignore,
            max_depth: None,
        }
    }

    /// Fail with `DepthExceeded` when directories nest deeper than `limit`.
    pub fn with_max_depth(mut self, limit: Option<usize>) -> Self {
        self.max_depth = limit;
        self
    }

    /// Snapshot `directory` and return the oid of its tree.
    #[instrument(skip_all, fields(directory = %directory.display()))]
    pub fn write_tree(&self, directory: &Path) -> Result<Oid, TreeError> {
        let start = Instant::now();
        info!("Starting tree write");

        let mut stats = BuildStats::default();
        let root_id = match self.write_directory(directory, 0, &mut stats) {
            Ok(oid) => oid,
            Err(e) => {
                error!("Tree write failed: {}", e);
                return Err(e);
            }
        };

        info!(
            root_id = %root_id,
            blobs = stats.blobs,
            trees = stats.trees,
            bytes = stats.bytes,
            duration_ms = start.elapsed().as_millis() as u64,
            "Tree write completed"
        );
        Ok(root_id)
    }

    /// Same as `write_tree`, also returning the counters.
    pub fn write_tree_with_stats(&self, directory: &Path) -> Result<(Oid, BuildStats), TreeError> {
        let mut stats = BuildStats::default();
        let oid = self.write_directory(directory, 0, &mut stats)?;
        Ok((oid, stats))
    }

    fn write_directory(
        &self,
        dir: &Path,
        depth: usize,
        stats: &mut BuildStats,
    ) -> Result<Oid, TreeError> {
        if let Some(limit) = self.max_depth {
            if depth > limit {
                return Err(TreeError::DepthExceeded {
                    path: dir.display().to_string(),
                    limit,
                });
            }
        }

        let children = walker::read_directory(dir, self.ignore)?;
        debug!(directory = %dir.display(), children = children.len(), "Read directory");

        let mut entries = Vec::with_capacity(children.len());
        for child in children {
            let entry = match child {
                Entry::File { path, name } => {
                    check_name(&path, &name)?;
                    let oid = self.write_blob(&path, stats)?;
                    TreeEntry::new(name, oid, ObjectKind::Blob)
                }
                Entry::Directory { path, name } => {
                    check_name(&path, &name)?;
                    let oid = self.write_directory(&path, depth + 1, stats)?;
                    TreeEntry::new(name, oid, ObjectKind::Tree)
                }
                Entry::Unsupported { path, kind } => {
                    return Err(TreeError::UnsupportedEntryKind {
                        path,
                        kind: kind.to_string(),
                    });
                }
            };
            entries.push(entry);
        }

        let payload = entry::serialize_entries(&mut entries);
        let oid = self.store.hash_object(&payload, ObjectKind::Tree)?;
        stats.trees += 1;
        trace!(directory = %dir.display(), tree = %oid, "Stored tree");
        Ok(oid)
    }

    fn write_blob(&self, file_path: &Path, stats: &mut BuildStats) -> Result<Oid, TreeError> {
        let content =
            std::fs::read(file_path).map_err(|e| TreeError::filesystem(file_path, e))?;
        let oid = self.store.hash_object(&content, ObjectKind::Blob)?;
        stats.blobs += 1;
        stats.bytes += content.len() as u64;
        trace!(path = %file_path.display(), blob = %oid, "Stored blob");
        Ok(oid)
    }
}

fn check_name(path: &Path, name: &str) -> Result<(), TreeError> {
    path::validate_entry_name(name).map_err(|reason| TreeError::InvalidEntryName {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    })
}
