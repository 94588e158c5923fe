//! CLI output: what a command prints, and error mapping to the CLI surface.

use crate::error::{ApiError, StorageError, TreeError};
use std::io::{self, Write};

/// Result of a command, written to stdout by the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// Printed followed by a newline
    Text(String),
    /// Object payloads, printed verbatim
    Raw(Vec<u8>),
}

impl CommandOutput {
    pub fn write_to<W: Write>(&self, mut out: W) -> io::Result<()> {
        match self {
            CommandOutput::Text(text) => writeln!(out, "{}", text)?,
            CommandOutput::Raw(bytes) => out.write_all(bytes)?,
        }
        out.flush()
    }
}

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::NotInitialized(_) => format!("fatal: {} (run `snaptree init`)", e),
        ApiError::Tree(TreeError::Storage(StorageError::MissingObject(oid)))
        | ApiError::StorageError(StorageError::MissingObject(oid)) => {
            format!("fatal: object {} not found", oid)
        }
        _ => format!("fatal: {}", e),
    }
}
