//! CLI route: single route table and run context. Dispatches to the repository and presentation.

use crate::cli::help::{command_name, needs_repository};
use crate::cli::output::CommandOutput;
use crate::cli::parse::{Commands, OutputFormat};
use crate::cli::presentation;
use crate::config::{ConfigLoader, SnapConfig};
use crate::error::{ApiError, TreeError};
use crate::repository::Repository;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, info_span};

/// Runtime context for CLI execution: workspace and config paths.
/// The repository is opened per command so `init` can run on a bare directory.
pub struct RunContext {
    workspace_root: PathBuf,
    config_path: Option<PathBuf>,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let workspace_root = absolute(&workspace_root)?;
        if let Some(ref path) = config_path {
            if !path.is_file() {
                return Err(ApiError::ConfigError(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
        }
        Ok(Self {
            workspace_root,
            config_path,
        })
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<CommandOutput, ApiError> {
        let span = info_span!("command", command = command_name(command));
        let _enter = span.enter();
        let started = Instant::now();

        let result = if needs_repository(command) {
            let repo = self.open_repository()?;
            self.execute_in(&repo, command)
        } else {
            self.init()
        };

        info!(
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn init(&self) -> Result<CommandOutput, ApiError> {
        let config = self.load_config(&self.workspace_root)?;
        let repo = Repository::init(&self.workspace_root, config)?;
        Ok(CommandOutput::Text(presentation::format_init_summary(&repo)))
    }

    fn execute_in(&self, repo: &Repository, command: &Commands) -> Result<CommandOutput, ApiError> {
        match command {
            Commands::Init => Err(ApiError::AlreadyInitialized(repo.root().to_path_buf())),
            Commands::HashObject { file } => {
                let oid = repo.hash_file(&absolute(file)?)?;
                Ok(CommandOutput::Text(oid.to_string()))
            }
            Commands::CatFile { oid, kind } => Ok(CommandOutput::Raw(repo.cat_file(oid, *kind)?)),
            Commands::WriteTree { dir } => {
                let dir = dir.as_deref().map(absolute).transpose()?;
                let oid = repo.write_tree(dir.as_deref())?;
                Ok(CommandOutput::Text(oid.to_string()))
            }
            Commands::LsTree {
                oid,
                recursive,
                format,
            } => {
                let text = if *recursive {
                    let map = repo.get_tree(Some(oid), "")?;
                    match format {
                        OutputFormat::Text => presentation::format_path_map_text(&map),
                        OutputFormat::Json => {
                            presentation::format_path_map_json(&map).map_err(json_error)?
                        }
                    }
                } else {
                    let entries = repo.list_tree(oid)?;
                    match format {
                        OutputFormat::Text => presentation::format_tree_entries_text(&entries),
                        OutputFormat::Json => {
                            presentation::format_tree_entries_json(&entries).map_err(json_error)?
                        }
                    }
                };
                Ok(CommandOutput::Text(text))
            }
            Commands::ReadTree { oid } => {
                let summary = repo.read_tree(oid)?;
                Ok(CommandOutput::Text(presentation::format_checkout_summary(
                    oid, &summary,
                )))
            }
        }
    }

    fn open_repository(&self) -> Result<Repository, ApiError> {
        let root = Repository::discover(&self.workspace_root)?;
        debug!(root = %root.display(), "Discovered repository");
        let config = self.load_config(&root)?;
        Repository::open(&root, config)
    }

    fn load_config(&self, root: &Path) -> Result<SnapConfig, ApiError> {
        match self.config_path {
            Some(ref path) => ConfigLoader::load_from_file(path),
            None if root.exists() => ConfigLoader::load(root),
            None => Ok(ConfigLoader::default()),
        }
    }
}

/// Resolve `path` against the process working directory.
fn absolute(path: &Path) -> Result<PathBuf, ApiError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|e| TreeError::filesystem(".", e))?;
    Ok(cwd.join(path))
}

fn json_error(e: serde_json::Error) -> ApiError {
    ApiError::InvalidArgument(format!("Failed to render JSON: {}", e))
}
