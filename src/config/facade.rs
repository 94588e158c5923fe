//! Configuration loader: merges every source into a validated `SnapConfig`.

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::SnapConfig;
use crate::error::ApiError;
use config::{File, FileFormat};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for the workspace at `workspace_root`
    ///
    /// Precedence (highest first): environment, workspace file, global file,
    /// defaults.
    pub fn load(workspace_root: &Path) -> Result<SnapConfig, ApiError> {
        Self::load_with_global(workspace_root, Self::global_config_path().as_deref())
    }

    /// Same as `load` with an explicit global config file location.
    pub fn load_with_global(
        workspace_root: &Path,
        global_path: Option<&Path>,
    ) -> Result<SnapConfig, ApiError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder, global_path)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder);

        let config: SnapConfig = builder.build()?.try_deserialize()?;
        debug!(backend = %config.storage.backend, "Configuration loaded");
        Self::validated(config)
    }

    /// Load configuration from a specific file (environment still applies)
    pub fn load_from_file(path: &Path) -> Result<SnapConfig, ApiError> {
        if !path.is_file() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path).format(FileFormat::Toml).required(true));
        let builder = environment::add_to_builder(builder);

        let config: SnapConfig = builder.build()?.try_deserialize()?;
        Self::validated(config)
    }

    /// Built-in defaults only
    pub fn default() -> SnapConfig {
        SnapConfig::default()
    }

    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    pub fn workspace_config_path(workspace_root: &Path) -> PathBuf {
        workspace_file::workspace_config_path(workspace_root)
    }

    fn validated(config: SnapConfig) -> Result<SnapConfig, ApiError> {
        config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        Ok(config)
    }
}
