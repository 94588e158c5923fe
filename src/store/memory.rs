//! In-memory object store

use crate::error::StorageError;
use crate::store::{ObjectStore, StoredObject};
use crate::types::{ObjectKind, Oid};
use parking_lot::RwLock;
use std::collections::HashMap;

/// HashMap-backed store for tests and embedding. Objects are cloned on read.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<Oid, StoredObject>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }

    /// Sorted list of all stored oids.
    pub fn all_ids(&self) -> Vec<Oid> {
        let mut ids: Vec<Oid> = self.objects.read().keys().copied().collect();
        ids.sort();
        ids
    }
}

impl ObjectStore for MemoryObjectStore {
    fn hash_object(&self, content: &[u8], kind: ObjectKind) -> Result<Oid, StorageError> {
        let object = StoredObject::new(kind, content);
        let oid = object.compute_id();
        self.objects.write().entry(oid).or_insert(object);
        Ok(oid)
    }

    fn get_object(
        &self,
        oid: &Oid,
        expected: Option<ObjectKind>,
    ) -> Result<Vec<u8>, StorageError> {
        let object = self
            .objects
            .read()
            .get(oid)
            .cloned()
            .ok_or(StorageError::MissingObject(*oid))?;
        object.into_payload(oid, expected)
    }

    fn contains(&self, oid: &Oid) -> Result<bool, StorageError> {
        Ok(self.objects.read().contains_key(oid))
    }
}
