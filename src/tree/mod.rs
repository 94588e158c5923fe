//! Content-addressed directory trees
//!
//! A snapshot is a graph of `tree` objects (one per directory) whose entries
//! point at `blob` objects (file contents) or further trees. The builder turns
//! a directory into that graph; the flattener turns it back into a flat
//! path map.

pub mod builder;
pub mod entry;
pub mod flatten;
pub mod hasher;
pub mod path;
pub mod walker;

pub use builder::TreeBuilder;
pub use entry::TreeEntry;
pub use flatten::{PathMap, TreeFlattener};
