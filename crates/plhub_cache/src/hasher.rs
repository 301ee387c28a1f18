//! Source file hashing and change detection.
//!
//! Computes content digests for source files and compares them against the
//! persisted build cache to identify which files are new, modified, deleted,
//! or unchanged since the last successful build.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use plhub_common::ContentHash;

use crate::error::CacheError;
use crate::manifest::BuildCache;

/// Result of comparing current source digests against the build cache.
///
/// Categorizes files as new (never compiled), modified (digest differs from
/// the last successful compile), deleted (in the cache but not on disk), or
/// unchanged (digest matches).
#[derive(Debug, Clone)]
pub struct ChangeSet {
    /// Files with no digest in the cache.
    pub new_files: Vec<PathBuf>,

    /// Files whose digest differs from the cached one.
    pub modified_files: Vec<PathBuf>,

    /// Files present in the cache but not in the current file set.
    pub deleted_files: Vec<PathBuf>,

    /// Files whose digest matches the cache.
    pub unchanged_files: Vec<PathBuf>,
}

impl ChangeSet {
    /// Returns `true` if nothing is new, modified, or deleted.
    pub fn is_empty(&self) -> bool {
        self.new_files.is_empty() && self.modified_files.is_empty() && self.deleted_files.is_empty()
    }

    /// Files that need recompiling before dependent expansion: new plus
    /// modified, in sorted order.
    pub fn dirty_files(&self) -> Vec<PathBuf> {
        let mut dirty: Vec<PathBuf> = self
            .new_files
            .iter()
            .chain(self.modified_files.iter())
            .cloned()
            .collect();
        dirty.sort();
        dirty
    }
}

/// Computes content digests of source files and diffs them against the cache.
pub struct SourceHasher;

impl SourceHasher {
    /// Computes the content digest of a single file.
    pub fn hash_file(path: &Path) -> Result<ContentHash, CacheError> {
        let content = std::fs::read(path).map_err(|e| CacheError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(ContentHash::from_bytes(&content))
    }

    /// Computes content digests for multiple files.
    ///
    /// Files that cannot be read are skipped; they surface as deleted in the
    /// change set and are retried on a later build.
    pub fn hash_files(paths: &[PathBuf]) -> HashMap<PathBuf, ContentHash> {
        let mut hashes = HashMap::with_capacity(paths.len());
        for path in paths {
            if let Ok(hash) = Self::hash_file(path) {
                hashes.insert(path.clone(), hash);
            }
        }
        hashes
    }

    /// Compares current digests against the build cache.
    ///
    /// Pure with respect to the cache: digests are only recorded after a
    /// successful compile, so a file that failed to compile keeps its stale
    /// digest and shows up as modified again here.
    pub fn detect_changes(
        current_hashes: &HashMap<PathBuf, ContentHash>,
        cache: &BuildCache,
    ) -> ChangeSet {
        let mut new_files = Vec::new();
        let mut modified_files = Vec::new();
        let mut unchanged_files = Vec::new();

        for (path, hash) in current_hashes {
            match cache.digest(path) {
                Some(stored) if stored == hash => unchanged_files.push(path.clone()),
                Some(_) => modified_files.push(path.clone()),
                None => new_files.push(path.clone()),
            }
        }

        let mut deleted_files: Vec<PathBuf> = cache
            .file_hashes
            .keys()
            .filter(|p| !current_hashes.contains_key(*p))
            .cloned()
            .collect();

        // Sort for deterministic ordering across runs
        new_files.sort();
        modified_files.sort();
        unchanged_files.sort();
        deleted_files.sort();

        ChangeSet {
            new_files,
            modified_files,
            deleted_files,
            unchanged_files,
        }
    }
}
