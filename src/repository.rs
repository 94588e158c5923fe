//! Repository: a working directory plus its `.snaptree` object store
//!
//! Ties together the root, the configured store backend, the ignore policy
//! and the depth limit so callers only deal with oids and paths.

use crate::checkout::{CheckoutSummary, Reconciler};
use crate::config::{ConfigLoader, SnapConfig, StoreBackend};
use crate::error::{ApiError, TreeError};
use crate::ignore::{IgnorePolicy, STORAGE_DIR_NAME};
use crate::store::{FileObjectStore, ObjectStore, SledObjectStore};
use crate::tree::entry::{self, TreeEntry};
use crate::tree::{PathMap, TreeBuilder, TreeFlattener};
use crate::types::{ObjectKind, Oid};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const OBJECTS_DIR: &str = "objects";
const DB_DIR: &str = "db";

pub struct Repository {
    root: PathBuf,
    store: Box<dyn ObjectStore>,
    ignore: IgnorePolicy,
    config: SnapConfig,
}

impl Repository {
    /// Create `.snaptree/` under `root`, write `config` there and open the
    /// configured backend.
    pub fn init(root: &Path, config: SnapConfig) -> Result<Self, ApiError> {
        fs::create_dir_all(root).map_err(|e| TreeError::filesystem(root, e))?;
        let root = canonical_root(root)?;
        let storage_dir = root.join(STORAGE_DIR_NAME);
        if storage_dir.exists() {
            return Err(ApiError::AlreadyInitialized(storage_dir));
        }

        config.validate().map_err(|errors| {
            let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(msgs.join("; "))
        })?;

        fs::create_dir_all(&storage_dir).map_err(|e| TreeError::filesystem(&storage_dir, e))?;
        let rendered = config
            .to_toml()
            .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e)))?;
        let config_path = ConfigLoader::workspace_config_path(&root);
        fs::write(&config_path, rendered).map_err(|e| TreeError::filesystem(&config_path, e))?;

        info!(root = %root.display(), backend = %config.storage.backend, "Initialized repository");
        Self::open_store(root, config)
    }

    /// Open an existing repository rooted at `root`.
    pub fn open(root: &Path, config: SnapConfig) -> Result<Self, ApiError> {
        let root = canonical_root(root)?;
        let storage_dir = root.join(STORAGE_DIR_NAME);
        if !storage_dir.is_dir() {
            return Err(ApiError::NotInitialized(storage_dir));
        }
        Self::open_store(root, config)
    }

    /// Find the nearest ancestor of `start` (inclusive) holding `.snaptree/`.
    pub fn discover(start: &Path) -> Result<PathBuf, ApiError> {
        let start = canonical_root(start)?;
        start
            .ancestors()
            .find(|dir| dir.join(STORAGE_DIR_NAME).is_dir())
            .map(Path::to_path_buf)
            .ok_or_else(|| ApiError::NotInitialized(start.join(STORAGE_DIR_NAME)))
    }

    fn open_store(root: PathBuf, config: SnapConfig) -> Result<Self, ApiError> {
        let storage_dir = root.join(STORAGE_DIR_NAME);
        let store: Box<dyn ObjectStore> = match config.storage.backend {
            StoreBackend::Files => Box::new(FileObjectStore::new(storage_dir.join(OBJECTS_DIR))?),
            StoreBackend::Sled => Box::new(SledObjectStore::new(storage_dir.join(DB_DIR))?),
        };
        debug!(root = %root.display(), backend = %config.storage.backend, "Opened object store");

        Ok(Self {
            ignore: config.ignore.policy(),
            root,
            store,
            config,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &SnapConfig {
        &self.config
    }

    pub fn ignore(&self) -> &IgnorePolicy {
        &self.ignore
    }

    pub fn store(&self) -> &dyn ObjectStore {
        self.store.as_ref()
    }

    pub fn hash_object(&self, content: &[u8], kind: ObjectKind) -> Result<Oid, ApiError> {
        let oid = self.store.hash_object(content, kind)?;
        self.store.flush()?;
        Ok(oid)
    }

    /// Store the contents of `path` as a blob.
    pub fn hash_file(&self, path: &Path) -> Result<Oid, ApiError> {
        let path = self.resolve(path);
        let content = fs::read(&path).map_err(|e| TreeError::filesystem(&path, e))?;
        self.hash_object(&content, ObjectKind::Blob)
    }

    pub fn cat_file(&self, oid: &Oid, expected: Option<ObjectKind>) -> Result<Vec<u8>, ApiError> {
        Ok(self.store.get_object(oid, expected)?)
    }

    /// Snapshot `directory` (the repository root when `None`).
    pub fn write_tree(&self, directory: Option<&Path>) -> Result<Oid, ApiError> {
        let directory = match directory {
            Some(dir) => self.resolve(dir),
            None => self.root.clone(),
        };
        let oid = TreeBuilder::new(self.store.as_ref(), &self.ignore)
            .with_max_depth(self.config.tree.max_depth)
            .write_tree(&directory)?;
        self.store.flush()?;
        Ok(oid)
    }

    pub fn get_tree(&self, oid: Option<&Oid>, base_path: &str) -> Result<PathMap, ApiError> {
        Ok(TreeFlattener::new(self.store.as_ref())
            .with_max_depth(self.config.tree.max_depth)
            .get_tree(oid, base_path)?)
    }

    /// Direct entries of one tree, in canonical order.
    pub fn list_tree(&self, oid: &Oid) -> Result<Vec<TreeEntry>, ApiError> {
        let payload = self.store.get_object(oid, Some(ObjectKind::Tree))?;
        Ok(entry::parse_entries(oid, &payload)?)
    }

    /// Replace the working directory contents with tree `oid`.
    pub fn read_tree(&self, oid: &Oid) -> Result<CheckoutSummary, ApiError> {
        Ok(Reconciler::new(self.store.as_ref(), &self.ignore, self.root.clone())
            .with_max_depth(self.config.tree.max_depth)
            .read_tree(oid)?)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

fn canonical_root(root: &Path) -> Result<PathBuf, ApiError> {
    dunce::canonicalize(root).map_err(|e| {
        ApiError::InvalidArgument(format!("Cannot resolve {}: {}", root.display(), e))
    })
}
