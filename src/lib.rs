//! snaptree: content-addressed directory snapshots
//!
//! Turns a directory into a Merkle graph of `blob` and `tree` objects in a
//! content-addressed store, flattens stored trees back into path maps, and
//! checks a stored tree out over a working directory.

pub mod checkout;
pub mod cli;
pub mod config;
pub mod error;
pub mod ignore;
pub mod logging;
pub mod repository;
pub mod store;
pub mod tree;
pub mod types;

pub use checkout::{CheckoutSummary, Reconciler};
pub use error::{ApiError, StorageError, TreeError};
pub use ignore::IgnorePolicy;
pub use repository::Repository;
pub use store::ObjectStore;
pub use types::{ObjectKind, Oid};
