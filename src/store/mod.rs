//! Object Store
//!
//! Content-addressed persistence for blobs and trees. Every backend stores
//! the same bincode envelope (`StoredObject`) keyed by its oid, so objects are
//! write-once and re-storing an existing oid is a no-op.

pub mod files;
pub mod memory;
pub mod persistence;

pub use files::FileObjectStore;
pub use memory::MemoryObjectStore;
pub use persistence::SledObjectStore;

use crate::error::StorageError;
use crate::tree::hasher;
use crate::types::{ObjectKind, Oid};
use serde::{Deserialize, Serialize};

/// Store interface consumed by the tree builder, flattener and checkout.
pub trait ObjectStore: Send + Sync {
    /// Persist `content` as an object of `kind` and return its oid.
    ///
    /// Idempotent: storing identical `(kind, content)` twice returns the same
    /// oid and leaves the first copy untouched.
    fn hash_object(&self, content: &[u8], kind: ObjectKind) -> Result<Oid, StorageError>;

    /// Return the payload of `oid`.
    ///
    /// Fails with `MissingObject` for unknown ids and `TypeMismatch` when
    /// `expected` is given and differs from the stored kind.
    fn get_object(&self, oid: &Oid, expected: Option<ObjectKind>)
        -> Result<Vec<u8>, StorageError>;

    fn contains(&self, oid: &Oid) -> Result<bool, StorageError>;

    /// Make every stored object durable. Backends that write through need
    /// not override this.
    fn flush(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

/// On-disk envelope shared by all backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    pub kind: ObjectKind,
    pub payload: Vec<u8>,
}

impl StoredObject {
    pub fn new(kind: ObjectKind, payload: &[u8]) -> Self {
        Self {
            kind,
            payload: payload.to_vec(),
        }
    }

    pub fn compute_id(&self) -> Oid {
        hasher::compute_object_id(self.kind, &self.payload)
    }

    pub fn encode(&self) -> Result<Vec<u8>, StorageError> {
        bincode::serialize(self).map_err(|e| StorageError::Corrupt {
            oid: self.compute_id(),
            reason: format!("Failed to serialize object: {}", e),
        })
    }

    /// Decode an envelope read back for `oid`, verifying the content hash.
    pub fn decode(oid: &Oid, bytes: &[u8]) -> Result<Self, StorageError> {
        let object: StoredObject =
            bincode::deserialize(bytes).map_err(|e| StorageError::Corrupt {
                oid: *oid,
                reason: format!("Failed to deserialize object: {}", e),
            })?;

        let actual = object.compute_id();
        if actual != *oid {
            return Err(StorageError::HashMismatch {
                expected: *oid,
                actual,
            });
        }

        Ok(object)
    }

    /// Unwrap the payload after checking the kind the caller expects.
    pub fn into_payload(
        self,
        oid: &Oid,
        expected: Option<ObjectKind>,
    ) -> Result<Vec<u8>, StorageError> {
        match expected {
            Some(expected) if expected != self.kind => Err(StorageError::TypeMismatch {
                oid: *oid,
                expected,
                actual: self.kind,
            }),
            _ => Ok(self.payload),
        }
    }
}
