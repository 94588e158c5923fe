//! Configuration System
//!
//! Layered configuration for the storage backend, the ignore policy, tree
//! limits and logging. Sources are merged in order: built-in defaults, the
//! global config file, the workspace config file, then `SNAPTREE__*`
//! environment variables.

use crate::ignore::IgnorePolicy;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub ignore: IgnoreConfig,

    #[serde(default)]
    pub tree: TreeConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which object store backend a repository uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// One file per object under `.snaptree/objects`
    #[default]
    Files,
    /// Embedded sled database under `.snaptree/db`
    Sled,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Files => write!(f, "files"),
            StoreBackend::Sled => write!(f, "sled"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StoreBackend,
}

/// Extra reserved segment names. The storage directory is always reserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IgnoreConfig {
    #[serde(default)]
    pub reserved: Vec<String>,
}

impl IgnoreConfig {
    pub fn policy(&self) -> IgnorePolicy {
        IgnorePolicy::with_reserved(self.reserved.iter().cloned())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Deepest directory nesting accepted by snapshot and checkout (root is 0)
    #[serde(default)]
    pub max_depth: Option<usize>,
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Ignore(String),
    Tree(String),
    Logging(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Ignore(msg) => write!(f, "ignore: {}", msg),
            ValidationError::Tree(msg) => write!(f, "tree: {}", msg),
            ValidationError::Logging(msg) => write!(f, "logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl SnapConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        for name in &self.ignore.reserved {
            if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
                errors.push(ValidationError::Ignore(format!(
                    "Reserved name {:?} must be a single path segment",
                    name
                )));
            }
        }

        if self.tree.max_depth == Some(0) {
            errors.push(ValidationError::Tree(
                "max_depth must be at least 1 (omit it for no limit)".to_string(),
            ));
        }

        if let Err(e) = crate::logging::validate(&self.logging) {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Render as the TOML written by `init`.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
