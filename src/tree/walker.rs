//! Filesystem walking for snapshot and checkout

use crate::error::TreeError;
use crate::ignore::IgnorePolicy;
use std::fs::FileType;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One directory entry, classified without following symlinks.
#[derive(Debug, Clone)]
pub enum Entry {
    File { path: PathBuf, name: String },
    Directory { path: PathBuf, name: String },
    /// Anything else: symlinks, devices, sockets, fifos.
    Unsupported { path: PathBuf, kind: &'static str },
}

impl Entry {
    pub fn path(&self) -> &Path {
        match self {
            Entry::File { path, .. }
            | Entry::Directory { path, .. }
            | Entry::Unsupported { path, .. } => path,
        }
    }
}

/// List the immediate children of `dir`, skipping ignored names.
///
/// The result is in filesystem order; callers that hash it must sort.
pub fn read_directory(dir: &Path, ignore: &IgnorePolicy) -> Result<Vec<Entry>, TreeError> {
    let read_dir = std::fs::read_dir(dir).map_err(|e| TreeError::filesystem(dir, e))?;

    let mut entries = Vec::new();
    for dir_entry in read_dir {
        let dir_entry = dir_entry.map_err(|e| TreeError::filesystem(dir, e))?;
        let path = dir_entry.path();

        let name = match dir_entry.file_name().into_string() {
            Ok(name) => name,
            Err(_) => {
                return Err(TreeError::InvalidEntryName {
                    path,
                    reason: "name is not valid UTF-8".to_string(),
                });
            }
        };

        if ignore.is_reserved_name(&name) {
            continue;
        }

        // DirEntry::file_type does not traverse symlinks
        let file_type = dir_entry
            .file_type()
            .map_err(|e| TreeError::filesystem(&path, e))?;

        let entry = if file_type.is_file() {
            Entry::File { path, name }
        } else if file_type.is_dir() {
            Entry::Directory { path, name }
        } else {
            Entry::Unsupported {
                path,
                kind: describe_special(&file_type),
            }
        };
        entries.push(entry);
    }

    Ok(entries)
}

#[cfg(unix)]
fn describe_special(file_type: &FileType) -> &'static str {
    use std::os::unix::fs::FileTypeExt;

    if file_type.is_symlink() {
        "symlink"
    } else if file_type.is_block_device() {
        "block device"
    } else if file_type.is_char_device() {
        "character device"
    } else if file_type.is_fifo() {
        "fifo"
    } else if file_type.is_socket() {
        "socket"
    } else {
        "special file"
    }
}

#[cfg(not(unix))]
fn describe_special(file_type: &FileType) -> &'static str {
    if file_type.is_symlink() {
        "symlink"
    } else {
        "special file"
    }
}

/// A path found by the bottom-up walk.
#[derive(Debug, Clone)]
pub struct WalkEntry {
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Bottom-up walker over a working directory.
///
/// Yields every non-ignored path below the root, children before their
/// parent directory. Ignored directories are not descended into and symlinks
/// are never followed.
pub struct Walker {
    root: PathBuf,
    ignore: IgnorePolicy,
}

impl Walker {
    pub fn new(root: PathBuf, ignore: IgnorePolicy) -> Self {
        Self { root, ignore }
    }

    pub fn walk_bottom_up(&self) -> Result<Vec<WalkEntry>, TreeError> {
        let mut entries = Vec::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| {
                let relative = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
                !self.ignore.is_ignored(relative)
            });

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| self.root.clone());
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "walk failed"));
                TreeError::filesystem(path, source)
            })?;

            entries.push(WalkEntry {
                path: entry.path().to_path_buf(),
                is_dir: entry.file_type().is_dir(),
            });
        }

        // Reversed pre-order puts every directory after all of its descendants
        entries.reverse();
        Ok(entries)
    }
}
