//! Error types for the snapshot kernel and its surrounding tool.

use crate::types::{ObjectKind, Oid};
use std::path::PathBuf;
use thiserror::Error;

/// Object store errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    MissingObject(Oid),

    #[error("Object {oid} is a {actual}, expected a {expected}")]
    TypeMismatch {
        oid: Oid,
        expected: ObjectKind,
        actual: ObjectKind,
    },

    #[error("Hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: Oid, actual: Oid },

    #[error("Corrupt object {oid}: {reason}")]
    Corrupt { oid: Oid, reason: String },

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors raised while snapshotting, flattening or checking out trees.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Unsupported entry kind ({kind}) at {}", path.display())]
    UnsupportedEntryKind { path: PathBuf, kind: String },

    #[error("Invalid entry name at {}: {reason}", path.display())]
    InvalidEntryName { path: PathBuf, reason: String },

    #[error("Corrupt entry in tree {tree} (line {line}): {reason}")]
    CorruptTreeEntry {
        tree: Oid,
        line: usize,
        reason: String,
    },

    #[error("Unknown entry kind {kind:?} in tree {tree} (line {line})")]
    UnknownEntryKind { tree: Oid, line: usize, kind: String },

    #[error("Path collision while flattening: {path}")]
    PathCollision { path: String },

    #[error("Maximum depth {limit} exceeded at {path}")]
    DepthExceeded { path: String, limit: usize },

    #[error("Filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl TreeError {
    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TreeError::Filesystem {
            path: path.into(),
            source,
        }
    }
}

/// Tool-level errors: configuration, repository layout and command dispatch.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not a snaptree repository (no {} found)", .0.display())]
    NotInitialized(PathBuf),

    #[error("Repository already initialized at {}", .0.display())]
    AlreadyInitialized(PathBuf),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Tree(#[from] TreeError),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
