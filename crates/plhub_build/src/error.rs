//! Error types for build orchestration.

use std::path::PathBuf;

/// Errors that can occur while orchestrating a build or watch session.
///
/// Per-file compile failures are not errors at this level; they are
/// aggregated into the build report. These variants cover failures of the
/// cycle itself.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// An I/O error occurred outside the cache subsystem.
    #[error("build I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The PohLang runtime binary could not be located.
    #[error("PohLang runtime not found; looked in runtime/bin, bin, and PATH")]
    RuntimeNotFound,

    /// The project manifest failed to load.
    #[error(transparent)]
    Config(#[from] plhub_config::ConfigError),

    /// The filesystem watcher could not be started.
    #[error("failed to start file watcher: {reason}")]
    Watcher {
        /// Description of the watcher failure.
        reason: String,
    },
}
