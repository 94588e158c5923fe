//! Entry name validation and wire path helpers

use std::path::{Path, PathBuf};

/// Check that `name` can be stored as a single tree entry name.
///
/// Returns the reason on failure. The same rules apply when writing a tree
/// from disk and when parsing a stored tree, so anything the builder accepts
/// the flattener accepts too.
pub fn validate_entry_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("name is empty");
    }
    if name == "." || name == ".." {
        return Err("name is a relative path component");
    }
    if name.contains('/') || name.contains(std::path::MAIN_SEPARATOR) {
        return Err("name contains a path separator");
    }
    if name.contains('\n') {
        return Err("name contains a newline");
    }
    if name.contains('\0') {
        return Err("name contains a NUL byte");
    }
    Ok(())
}

/// Append a segment to a `/`-joined wire path prefix.
pub fn join_wire_path(base: &str, name: &str) -> String {
    let mut path = String::with_capacity(base.len() + name.len());
    path.push_str(base);
    path.push_str(name);
    path
}

/// Resolve a `/`-joined relative wire path under a filesystem root.
pub fn wire_path_to_fs(root: &Path, wire_path: &str) -> PathBuf {
    wire_path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .fold(root.to_path_buf(), |path, segment| path.join(segment))
}
