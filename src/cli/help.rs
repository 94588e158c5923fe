//! CLI command-name contract for logging and routing.

use crate::cli::parse::Commands;

/// Command name string recorded on the command span (e.g. "write-tree").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Init => "init",
        Commands::HashObject { .. } => "hash-object",
        Commands::CatFile { .. } => "cat-file",
        Commands::WriteTree { .. } => "write-tree",
        Commands::LsTree { .. } => "ls-tree",
        Commands::ReadTree { .. } => "read-tree",
    }
}

/// Commands that can run before `.snaptree` exists.
pub fn needs_repository(command: &Commands) -> bool {
    !matches!(command, Commands::Init)
}
