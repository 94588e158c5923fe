//! Workspace config file source: <root>/.snaptree/config.toml

use crate::ignore::STORAGE_DIR_NAME;
use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::{File, FileFormat};
use std::path::{Path, PathBuf};

pub fn workspace_config_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(STORAGE_DIR_NAME).join("config.toml")
}

/// Add the workspace config file to builder. Overrides the global file.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let path = workspace_config_path(workspace_root);
    if path.is_file() {
        return Ok(builder.add_source(File::from(path).format(FileFormat::Toml).required(false)));
    }
    Ok(builder)
}
