//! The persisted build-cache record.
//!
//! Stored as `build_cache.json` under the project's `.plhub/cache/`
//! directory. Records the content digest of every successfully compiled
//! source file, the dependency edges from the last build (persisted for
//! inspection; rebuilt fresh each run), the timestamp of the last build,
//! and a running build counter.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use plhub_common::ContentHash;
use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// Persisted state of the incremental build system.
///
/// Both maps are keyed by absolute, OS-native paths so digest lookups and
/// dependency lookups agree on file identity. All fields default so a cache
/// written by an older or newer PLHub still loads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildCache {
    /// Content digest of each file at its last successful compile.
    #[serde(default)]
    pub file_hashes: BTreeMap<PathBuf, ContentHash>,

    /// RFC 3339 timestamp of the last build, empty before the first build.
    #[serde(default)]
    pub last_build: String,

    /// Direct dependency edges from the last build (file to imported files).
    #[serde(default)]
    pub dependencies: BTreeMap<PathBuf, Vec<PathBuf>>,

    /// Number of build cycles recorded against this cache.
    #[serde(default)]
    pub build_count: u64,
}

impl BuildCache {
    /// Loads the cache from `cache_file`.
    ///
    /// A missing file yields an empty cache (first build). Unreadable or
    /// corrupt content is an explicit error; the build pipeline downgrades
    /// it to a warning and starts fresh rather than aborting.
    pub fn load(cache_file: &Path) -> Result<Self, CacheError> {
        let content = match std::fs::read_to_string(cache_file) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(CacheError::Io {
                    path: cache_file.to_path_buf(),
                    source: e,
                })
            }
        };
        serde_json::from_str(&content).map_err(|e| CacheError::Parse {
            path: cache_file.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Saves the cache to `cache_file`, creating parent directories as
    /// needed.
    ///
    /// The write goes to a sibling temp file which is then renamed into
    /// place, so a crash mid-save never leaves a truncated cache.
    pub fn save(&self, cache_file: &Path) -> Result<(), CacheError> {
        if let Some(parent) = cache_file.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CacheError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| CacheError::Serialization {
            reason: e.to_string(),
        })?;

        let tmp = cache_file.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| CacheError::Io {
            path: tmp.clone(),
            source: e,
        })?;
        std::fs::rename(&tmp, cache_file).map_err(|e| CacheError::Io {
            path: cache_file.to_path_buf(),
            source: e,
        })
    }

    /// Returns the stored digest for `path`, if the file has ever compiled
    /// successfully.
    pub fn digest(&self, path: &Path) -> Option<&ContentHash> {
        self.file_hashes.get(path)
    }

    /// Records a successful compile of `path` with its current digest.
    ///
    /// Failed compiles are deliberately not recorded: the stale digest keeps
    /// the file flagged as changed so it is retried on the next build.
    pub fn record_success(&mut self, path: &Path, digest: ContentHash) {
        self.file_hashes.insert(path.to_path_buf(), digest);
    }

    /// Stamps the end of a build cycle: sets `last_build` and increments the
    /// build counter.
    pub fn stamp(&mut self, timestamp: String) {
        self.last_build = timestamp;
        self.build_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cache_is_empty() {
        let cache = BuildCache::default();
        assert!(cache.file_hashes.is_empty());
        assert!(cache.dependencies.is_empty());
        assert!(cache.last_build.is_empty());
        assert_eq!(cache.build_count, 0);
    }

    #[test]
    fn load_missing_file_yields_empty_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = BuildCache::load(&dir.path().join("build_cache.json")).unwrap();
        assert!(cache.file_hashes.is_empty());
        assert_eq!(cache.build_count, 0);
    }

    #[test]
    fn load_corrupt_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("build_cache.json");
        std::fs::write(&path, "not valid json {{{").unwrap();
        let err = BuildCache::load(&path).unwrap_err();
        assert!(matches!(err, CacheError::Parse { .. }));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".plhub").join("cache").join("build_cache.json");

        let mut cache = BuildCache::default();
        cache.record_success(
            Path::new("/proj/src/main.poh"),
            ContentHash::from_bytes(b"main content"),
        );
        cache.dependencies.insert(
            PathBuf::from("/proj/src/main.poh"),
            vec![PathBuf::from("/proj/src/util.poh")],
        );
        cache.stamp("2026-08-07T12:00:00Z".to_string());
        cache.save(&path).unwrap();

        let loaded = BuildCache::load(&path).unwrap();
        assert_eq!(loaded.file_hashes, cache.file_hashes);
        assert_eq!(loaded.dependencies, cache.dependencies);
        assert_eq!(loaded.last_build, "2026-08-07T12:00:00Z");
        assert_eq!(loaded.build_count, 1);
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deeply").join("nested").join("cache.json");
        BuildCache::default().save(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("build_cache.json");
        BuildCache::default().save(&path).unwrap();
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn missing_keys_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("build_cache.json");
        std::fs::write(&path, r#"{ "build_count": 7 }"#).unwrap();

        let cache = BuildCache::load(&path).unwrap();
        assert_eq!(cache.build_count, 7);
        assert!(cache.file_hashes.is_empty());
        assert!(cache.last_build.is_empty());
    }

    #[test]
    fn record_success_overwrites_previous_digest() {
        let mut cache = BuildCache::default();
        let path = Path::new("/proj/a.poh");
        cache.record_success(path, ContentHash::from_bytes(b"v1"));
        cache.record_success(path, ContentHash::from_bytes(b"v2"));
        assert_eq!(cache.digest(path), Some(&ContentHash::from_bytes(b"v2")));
        assert_eq!(cache.file_hashes.len(), 1);
    }

    #[test]
    fn stamp_increments_counter() {
        let mut cache = BuildCache::default();
        cache.stamp("2026-08-07T12:00:00Z".to_string());
        cache.stamp("2026-08-07T12:05:00Z".to_string());
        assert_eq!(cache.build_count, 2);
        assert_eq!(cache.last_build, "2026-08-07T12:05:00Z");
    }
}
