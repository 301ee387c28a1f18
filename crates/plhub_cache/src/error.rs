//! Error types for cache operations.

use std::path::PathBuf;

/// Errors that can occur during build-cache operations.
///
/// Cache reads are fail-safe at the pipeline level: a load error results in
/// a fresh empty cache (and a warning), never an aborted build. This enum is
/// used for propagation within the cache subsystem so callers can decide
/// whether to surface or downgrade a failure.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An I/O error occurred while reading or writing a file.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The cache file could not be parsed as valid JSON.
    #[error("failed to parse build cache at {path}: {reason}")]
    Parse {
        /// The cache file path.
        path: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// A serialization error occurred while writing the cache.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },
}
