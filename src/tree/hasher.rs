//! Object id computation using BLAKE3

use crate::types::{ObjectKind, Oid};
use blake3::Hasher;

/// Compute the oid of an object
///
/// oid = hash(kind || 0x00 || payload)
///
/// The kind token acts as a type discriminator, so a blob and a tree with
/// the same payload never share an id.
pub fn compute_object_id(kind: ObjectKind, payload: &[u8]) -> Oid {
    let mut hasher = Hasher::new();

    // Hash type discriminator
    hasher.update(kind.as_str().as_bytes());
    hasher.update(&[0u8]);

    // Hash payload
    hasher.update(payload);

    Oid::from_bytes(*hasher.finalize().as_bytes())
}

/// Oid of the tree with no entries.
pub fn empty_tree_id() -> Oid {
    compute_object_id(ObjectKind::Tree, b"")
}
