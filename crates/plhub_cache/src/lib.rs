//! Incremental build cache for PohLang projects: content hashing, import
//! extraction, dependency graphs, and the persisted build-cache record.

pub mod error;
pub mod graph;
pub mod hasher;
pub mod imports;
pub mod manifest;

pub use error::CacheError;
pub use graph::{DependencyGraph, GraphResult, UnresolvedImport};
pub use hasher::{ChangeSet, SourceHasher};
pub use manifest::BuildCache;
