//! Filesystem-backed object store
//!
//! Objects live at `{root}/{hex[0..2]}/{hex}`. Writes go to a temporary file
//! and are renamed into place, so a reader never observes a partial object.

use crate::error::StorageError;
use crate::store::{ObjectStore, StoredObject};
use crate::types::{ObjectKind, Oid};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

// Distinguishes temp files of concurrent writers of the same object
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

pub struct FileObjectStore {
    root: PathBuf,
}

impl FileObjectStore {
    /// Open (creating if needed) an object directory at `root`.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self, StorageError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|e| {
            StorageError::IoError(std::io::Error::new(
                e.kind(),
                format!("Failed to create objects directory at {:?}: {}", root, e),
            ))
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, oid: &Oid) -> PathBuf {
        let hex = oid.to_hex();
        self.root.join(&hex[0..2]).join(hex)
    }
}

impl ObjectStore for FileObjectStore {
    fn hash_object(&self, content: &[u8], kind: ObjectKind) -> Result<Oid, StorageError> {
        let object = StoredObject::new(kind, content);
        let oid = object.compute_id();
        let object_path = self.object_path(&oid);

        // Write-once: same oid means same content
        if object_path.exists() {
            trace!(%oid, "Object already stored");
            return Ok(oid);
        }

        if let Some(parent) = object_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StorageError::IoError(std::io::Error::new(
                    e.kind(),
                    format!("Failed to create parent directory {:?}: {}", parent, e),
                ))
            })?;
        }

        let serialized = object.encode()?;
        let temp_path = object_path.with_extension(format!(
            "tmp.{}.{}",
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        fs::write(&temp_path, &serialized).map_err(|e| {
            StorageError::IoError(std::io::Error::new(
                e.kind(),
                format!("Failed to write object to {:?}: {}", temp_path, e),
            ))
        })?;

        fs::rename(&temp_path, &object_path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            StorageError::IoError(std::io::Error::new(
                e.kind(),
                format!("Failed to rename temp file to {:?}: {}", object_path, e),
            ))
        })?;

        trace!(%oid, %kind, size = content.len(), "Stored object");
        Ok(oid)
    }

    fn get_object(
        &self,
        oid: &Oid,
        expected: Option<ObjectKind>,
    ) -> Result<Vec<u8>, StorageError> {
        let object_path = self.object_path(oid);
        let bytes = match fs::read(&object_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::MissingObject(*oid));
            }
            Err(e) => {
                return Err(StorageError::IoError(std::io::Error::new(
                    e.kind(),
                    format!("Failed to read object from {:?}: {}", object_path, e),
                )));
            }
        };

        StoredObject::decode(oid, &bytes)?.into_payload(oid, expected)
    }

    fn contains(&self, oid: &Oid) -> Result<bool, StorageError> {
        Ok(self.object_path(oid).is_file())
    }
}
