//! CLI presentation: text and json formatters per command.

use crate::checkout::CheckoutSummary;
use crate::repository::Repository;
use crate::tree::{PathMap, TreeEntry};
use crate::types::{ObjectKind, Oid};
use serde::Serialize;

#[derive(Serialize)]
struct EntryJson<'a> {
    kind: ObjectKind,
    oid: String,
    name: &'a str,
}

/// One `<kind> <oid>\t<name>` line per entry.
pub fn format_tree_entries_text(entries: &[TreeEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{} {}\t{}", e.kind, e.oid, e.name))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_tree_entries_json(entries: &[TreeEntry]) -> Result<String, serde_json::Error> {
    let rows: Vec<EntryJson<'_>> = entries
        .iter()
        .map(|e| EntryJson {
            kind: e.kind,
            oid: e.oid.to_hex(),
            name: &e.name,
        })
        .collect();
    serde_json::to_string_pretty(&rows)
}

pub fn format_path_map_text(map: &PathMap) -> String {
    map.iter()
        .map(|(path, oid)| format!("{} {}\t{}", ObjectKind::Blob, oid, path))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_path_map_json(map: &PathMap) -> Result<String, serde_json::Error> {
    let rows: Vec<EntryJson<'_>> = map
        .iter()
        .map(|(path, oid)| EntryJson {
            kind: ObjectKind::Blob,
            oid: oid.to_hex(),
            name: path,
        })
        .collect();
    serde_json::to_string_pretty(&rows)
}

pub fn format_checkout_summary(oid: &Oid, summary: &CheckoutSummary) -> String {
    let mut text = format!(
        "Checked out {}: {} written, {} removed ({} directories)",
        oid, summary.files_written, summary.files_removed, summary.dirs_removed
    );
    if summary.skipped > 0 {
        text.push_str(&format!(", {} reserved paths skipped", summary.skipped));
    }
    text
}

pub fn format_init_summary(repo: &Repository) -> String {
    format!(
        "Initialized empty snaptree repository in {} (backend: {})",
        repo.root().join(crate::ignore::STORAGE_DIR_NAME).display(),
        repo.config().storage.backend
    )
}
