//! Sled-backed object store

use crate::error::StorageError;
use crate::store::{ObjectStore, StoredObject};
use crate::types::{ObjectKind, Oid};
use std::path::Path;
use tracing::trace;

/// Object store kept in an embedded sled database, keyed by raw oid bytes.
pub struct SledObjectStore {
    db: sled::Db,
}

impl SledObjectStore {
    /// Create a new SledObjectStore at the given path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = sled::open(path).map_err(|e| {
            StorageError::IoError(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Failed to open sled database: {}", e),
            ))
        })?;
        Ok(Self { db })
    }

    /// Wrap an already opened database.
    pub fn from_db(db: sled::Db) -> Self {
        Self { db }
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }
}

impl ObjectStore for SledObjectStore {
    fn hash_object(&self, content: &[u8], kind: ObjectKind) -> Result<Oid, StorageError> {
        let object = StoredObject::new(kind, content);
        let oid = object.compute_id();
        let value = object.encode()?;

        // compare_and_swap against "absent" keeps the first copy: write-once
        let outcome = self
            .db
            .compare_and_swap(oid.as_bytes(), None as Option<&[u8]>, Some(value))
            .map_err(|e| {
                StorageError::IoError(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("Failed to put object {}: {}", oid, e),
                ))
            })?;

        if outcome.is_ok() {
            trace!(%oid, %kind, size = content.len(), "Stored object");
        } else {
            trace!(%oid, "Object already stored");
        }
        Ok(oid)
    }

    fn get_object(
        &self,
        oid: &Oid,
        expected: Option<ObjectKind>,
    ) -> Result<Vec<u8>, StorageError> {
        let value = self.db.get(oid.as_bytes()).map_err(|e| {
            StorageError::IoError(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Failed to get object {}: {}", oid, e),
            ))
        })?;

        match value {
            Some(bytes) => StoredObject::decode(oid, &bytes)?.into_payload(oid, expected),
            None => Err(StorageError::MissingObject(*oid)),
        }
    }

    fn contains(&self, oid: &Oid) -> Result<bool, StorageError> {
        self.db.contains_key(oid.as_bytes()).map_err(|e| {
            StorageError::IoError(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Failed to check object existence: {}", e),
            ))
        })
    }

    /// Flush all pending writes to disk
    fn flush(&self) -> Result<(), StorageError> {
        self.db.flush().map_err(|e| {
            StorageError::IoError(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Failed to flush database: {}", e),
            ))
        })?;
        Ok(())
    }
}
