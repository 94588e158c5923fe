//! Ignore policy for snapshot and checkout.
//!
//! A path is ignored when any of its segments equals a reserved name. The
//! storage directory name is always reserved; configuration may add more.
//! The same policy value is handed to the tree builder and to the checkout
//! reconciler so the two directions can never disagree about what belongs to
//! the tool.

use std::collections::BTreeSet;
use std::path::{Component, Path};

/// Name of the directory holding the tool's private storage.
pub const STORAGE_DIR_NAME: &str = ".snaptree";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnorePolicy {
    reserved: BTreeSet<String>,
}

impl Default for IgnorePolicy {
    fn default() -> Self {
        let mut reserved = BTreeSet::new();
        reserved.insert(STORAGE_DIR_NAME.to_string());
        Self { reserved }
    }
}

impl IgnorePolicy {
    /// Policy reserving only the storage directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Policy reserving the storage directory plus `extra` segment names.
    pub fn with_reserved<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut policy = Self::default();
        policy.reserved.extend(extra.into_iter().map(Into::into));
        policy
    }

    pub fn reserved(&self) -> impl Iterator<Item = &str> {
        self.reserved.iter().map(String::as_str)
    }

    /// True iff a single path segment is reserved.
    pub fn is_reserved_name(&self, name: &str) -> bool {
        self.reserved.contains(name)
    }

    /// True iff any segment of `path` is reserved.
    pub fn is_ignored(&self, path: &Path) -> bool {
        path.components().any(|component| match component {
            Component::Normal(name) => name
                .to_str()
                .map(|name| self.is_reserved_name(name))
                .unwrap_or(false),
            _ => false,
        })
    }

    /// Same check for a `/`-joined relative path as produced by flattening.
    pub fn is_ignored_str(&self, path: &str) -> bool {
        path.split('/').any(|segment| self.is_reserved_name(segment))
    }
}
