//! CLI parse: clap types for snaptree. No behavior; definitions only.

use crate::types::{ObjectKind, Oid};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// snaptree - content-addressed directory snapshots
#[derive(Parser)]
#[command(name = "snaptree")]
#[command(about = "Snapshot directories into a content-addressed store and restore them")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (searched upwards for .snaptree)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(long, short = 'v', default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (used when output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create .snaptree in the workspace
    Init,
    /// Store a file as a blob and print its oid
    HashObject {
        /// File to store
        file: PathBuf,
    },
    /// Print the payload of an object
    CatFile {
        oid: Oid,
        /// Fail unless the object has this kind
        #[arg(long, value_parser = parse_kind)]
        kind: Option<ObjectKind>,
    },
    /// Snapshot a directory and print the tree oid
    WriteTree {
        /// Directory to snapshot (defaults to the workspace root)
        dir: Option<PathBuf>,
    },
    /// List the entries of a tree
    LsTree {
        oid: Oid,
        /// List every blob path reachable from the tree
        #[arg(long, short = 'r')]
        recursive: bool,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Replace the workspace contents with a stored tree
    ReadTree { oid: Oid },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

fn parse_kind(s: &str) -> Result<ObjectKind, String> {
    s.parse::<ObjectKind>()
        .map_err(|token| format!("unknown object kind '{}' (expected blob or tree)", token))
}
