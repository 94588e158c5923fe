//! Working directory checkout
//!
//! `read_tree` replaces the non-ignored contents of a working directory with
//! a stored snapshot in two phases: clear everything the ignore policy does
//! not protect, then write every blob of the flattened tree. The tree is
//! flattened and every blob is read back and verified before anything is
//! deleted, so a corrupt or incomplete snapshot is rejected while the
//! directory is still intact.
//! Once clearing starts the operation is not atomic.

use crate::error::TreeError;
use crate::ignore::IgnorePolicy;
use crate::store::ObjectStore;
use crate::tree::flatten::{PathMap, TreeFlattener};
use crate::tree::path::wire_path_to_fs;
use crate::tree::walker::Walker;
use crate::types::{ObjectKind, Oid};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, instrument, trace, warn};

/// What a checkout did to the working directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutSummary {
    pub files_removed: usize,
    pub dirs_removed: usize,
    pub files_written: usize,
    /// Paths in the snapshot that the ignore policy reserves.
    pub skipped: usize,
}

pub struct Reconciler<'a, S: ObjectStore + ?Sized> {
    store: &'a S,
    ignore: &'a IgnorePolicy,
    root: PathBuf,
    max_depth: Option<usize>,
}

impl<'a, S: ObjectStore + ?Sized> Reconciler<'a, S> {
    pub fn new(store: &'a S, ignore: &'a IgnorePolicy, root: impl Into<PathBuf>) -> Self {
        Self {
            store,
            ignore,
            root: root.into(),
            max_depth: None,
        }
    }

    pub fn with_max_depth(mut self, limit: Option<usize>) -> Self {
        self.max_depth = limit;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Make the working directory match tree `tree_oid`.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn read_tree(&self, tree_oid: &Oid) -> Result<CheckoutSummary, TreeError> {
        let start = Instant::now();
        info!("Starting checkout");

        let snapshot = TreeFlattener::new(self.store)
            .with_max_depth(self.max_depth)
            .get_tree(Some(tree_oid), "")?;
        self.verify_blobs(&snapshot)?;

        let mut summary = CheckoutSummary::default();
        self.clear(&mut summary)?;
        self.materialize(&snapshot, &mut summary)?;

        info!(
            files_removed = summary.files_removed,
            dirs_removed = summary.dirs_removed,
            files_written = summary.files_written,
            skipped = summary.skipped,
            duration_ms = start.elapsed().as_millis() as u64,
            "Checkout completed"
        );
        Ok(summary)
    }

    /// Delete every non-ignored file and every directory that becomes empty.
    ///
    /// Directories still holding ignored content are left in place.
    pub fn clear(&self, summary: &mut CheckoutSummary) -> Result<(), TreeError> {
        let walker = Walker::new(self.root.clone(), self.ignore.clone());

        for entry in walker.walk_bottom_up()? {
            if entry.is_dir {
                match fs::remove_dir(&entry.path) {
                    Ok(()) => {
                        trace!(path = %entry.path.display(), "Removed directory");
                        summary.dirs_removed += 1;
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) if has_entries(&entry.path) => {
                        debug!(path = %entry.path.display(), error = %e, "Kept non-empty directory");
                    }
                    Err(e) => return Err(TreeError::filesystem(&entry.path, e)),
                }
            } else {
                match fs::remove_file(&entry.path) {
                    Ok(()) => {
                        trace!(path = %entry.path.display(), "Removed file");
                        summary.files_removed += 1;
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => return Err(TreeError::filesystem(&entry.path, e)),
                }
            }
        }

        Ok(())
    }

    /// Every blob must exist, be a blob and match its oid.
    fn verify_blobs(&self, snapshot: &PathMap) -> Result<(), TreeError> {
        for (path, oid) in snapshot.iter() {
            self.store.get_object(oid, Some(ObjectKind::Blob))?;
            trace!(path, blob = %oid, "Verified blob");
        }
        Ok(())
    }

    fn materialize(
        &self,
        snapshot: &PathMap,
        summary: &mut CheckoutSummary,
    ) -> Result<(), TreeError> {
        for (path, oid) in snapshot.iter() {
            if self.ignore.is_ignored_str(path) {
                warn!(path, "Snapshot contains a reserved path, not writing it");
                summary.skipped += 1;
                continue;
            }

            let target = wire_path_to_fs(&self.root, path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| TreeError::filesystem(parent, e))?;
            }

            let content = self.store.get_object(oid, Some(ObjectKind::Blob))?;
            fs::write(&target, &content).map_err(|e| TreeError::filesystem(&target, e))?;
            trace!(path, blob = %oid, size = content.len(), "Wrote file");
            summary.files_written += 1;
        }
        Ok(())
    }
}

fn has_entries(dir: &Path) -> bool {
    fs::read_dir(dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}
