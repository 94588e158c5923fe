//! Tree entries and the tree payload wire format.
//!
//! A tree payload is UTF-8 text with one line per entry:
//!
//! ```text
//! <kind> <oid> <name>\n
//! ```
//!
//! Entries are sorted by `(name, oid, kind)` before serialization so the
//! payload, and therefore the tree oid, does not depend on the order in which
//! the filesystem listed the directory.

use crate::error::TreeError;
use crate::tree::path;
use crate::types::{ObjectKind, Oid};
use std::collections::HashSet;
use tracing::warn;

/// One named child of a tree.
///
/// Field order matters: the derived `Ord` is the canonical sort.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TreeEntry {
    pub name: String,
    pub oid: Oid,
    pub kind: ObjectKind,
}

impl TreeEntry {
    pub fn new(name: impl Into<String>, oid: Oid, kind: ObjectKind) -> Self {
        Self {
            name: name.into(),
            oid,
            kind,
        }
    }
}

/// Sort `entries` canonically and render the tree payload.
pub fn serialize_entries(entries: &mut [TreeEntry]) -> Vec<u8> {
    entries.sort();

    let mut payload = String::new();
    for entry in entries.iter() {
        payload.push_str(entry.kind.as_str());
        payload.push(' ');
        payload.push_str(&entry.oid.to_hex());
        payload.push(' ');
        payload.push_str(&entry.name);
        payload.push('\n');
    }
    payload.into_bytes()
}

/// Parse and validate the payload of tree `tree`.
///
/// Lines are split on the first two spaces only, so names may contain spaces.
/// A name may appear at most once per tree.
pub fn parse_entries(tree: &Oid, payload: &[u8]) -> Result<Vec<TreeEntry>, TreeError> {
    let text = std::str::from_utf8(payload).map_err(|e| TreeError::CorruptTreeEntry {
        tree: *tree,
        line: 0,
        reason: format!("payload is not valid UTF-8: {}", e),
    })?;

    let mut entries = Vec::new();
    let mut seen = HashSet::new();
    for (index, line) in text.split_terminator('\n').enumerate() {
        let line_no = index + 1;
        let corrupt = |reason: String| TreeError::CorruptTreeEntry {
            tree: *tree,
            line: line_no,
            reason,
        };

        let mut fields = line.splitn(3, ' ');
        let (kind, oid, name) = match (fields.next(), fields.next(), fields.next()) {
            (Some(kind), Some(oid), Some(name)) => (kind, oid, name),
            _ => return Err(corrupt(format!("expected '<kind> <oid> <name>', got {:?}", line))),
        };

        let kind: ObjectKind = kind.parse().map_err(|kind| TreeError::UnknownEntryKind {
            tree: *tree,
            line: line_no,
            kind,
        })?;
        let oid: Oid = oid.parse().map_err(|e| corrupt(format!("{}", e)))?;
        path::validate_entry_name(name).map_err(|reason| corrupt(format!("{}: {:?}", reason, name)))?;
        if !seen.insert(name) {
            return Err(corrupt(format!("duplicate entry name {:?}", name)));
        }

        entries.push(TreeEntry {
            name: name.to_string(),
            oid,
            kind,
        });
    }

    if entries.windows(2).any(|pair| pair[0] > pair[1]) {
        warn!(tree = %tree, "Tree payload is not in canonical order");
    }

    Ok(entries)
}
