//! The incremental build cycle.
//!
//! Orchestrates one full pass of the build system:
//! 1. Load the persisted cache
//! 2. Discover `.poh` source files
//! 3. Hash and diff against the cache
//! 4. Rebuild the dependency graph from import declarations
//! 5. Expand changed files to the transitive rebuild set
//! 6. Compile each file in order, never aborting early
//! 7. Persist updated digests and the build counter
//!
//! The cache is owned by the cycle as an explicit value: loaded in `new`,
//! mutated during `run`, saved at the end. Nothing here is global, so tests
//! drive cycles against temp directories deterministically.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use plhub_cache::{graph, BuildCache, SourceHasher, UnresolvedImport};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::compiler::Compiler;
use crate::error::BuildError;
use crate::runtime::locate_runtime;

/// Aggregate result of one build cycle.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Number of files that compiled successfully.
    pub succeeded: usize,
    /// Number of files that failed to compile.
    pub failed: usize,
    /// Per-file result lines, in compile order.
    pub messages: Vec<String>,
    /// The files that were selected for recompilation, in compile order.
    pub rebuilt: Vec<PathBuf>,
    /// Import strings that resolved to no file (likely typos).
    pub unresolved_imports: Vec<UnresolvedImport>,
    /// Non-fatal problems: corrupt cache load, failed save, unreadable
    /// source files during import scanning.
    pub warnings: Vec<String>,
}

impl BuildReport {
    /// Returns `true` if no file failed to compile.
    pub fn success(&self) -> bool {
        self.failed == 0
    }

    /// One-line human summary of the cycle.
    pub fn summary(&self) -> String {
        if self.rebuilt.is_empty() {
            "No files to build".to_string()
        } else if self.failed == 0 {
            format!("Build successful: {} file(s) compiled", self.succeeded)
        } else {
            format!(
                "Build completed with errors: {} ok, {} failed",
                self.succeeded, self.failed
            )
        }
    }
}

/// A reusable build cycle bound to one project.
///
/// Holds the loaded cache for the lifetime of the invocation (or the whole
/// watch-mode session) and writes it back once per cycle.
#[derive(Debug)]
pub struct BuildCycle {
    project_root: PathBuf,
    cache_file: PathBuf,
    cache: BuildCache,
    compiler: Compiler,
    load_warning: Option<String>,
}

impl BuildCycle {
    /// Creates a build cycle for `project_root`, locating the runtime under
    /// `plhub_root`.
    ///
    /// A corrupt cache file is downgraded to a warning on the first report;
    /// the cycle then starts from an empty cache and rebuilds everything.
    pub fn new(project_root: &Path, plhub_root: &Path) -> Result<Self, BuildError> {
        // A build cycle only makes sense inside a project; surface manifest
        // problems here rather than mid-cycle.
        plhub_config::load_manifest(project_root)?;

        let runtime = locate_runtime(plhub_root);
        let compiler = Compiler::new(runtime, project_root);
        Self::with_compiler(project_root, compiler)
    }

    /// Creates a build cycle with a pre-built compiler (used by tests to
    /// script compile outcomes).
    pub fn with_compiler(project_root: &Path, compiler: Compiler) -> Result<Self, BuildError> {
        let project_root =
            std::fs::canonicalize(project_root).map_err(|e| BuildError::Io {
                path: project_root.to_path_buf(),
                source: e,
            })?;
        let cache_file = project_root
            .join(".plhub")
            .join("cache")
            .join("build_cache.json");

        let (cache, load_warning) = match BuildCache::load(&cache_file) {
            Ok(cache) => (cache, None),
            Err(e) => (
                BuildCache::default(),
                Some(format!("build cache discarded: {e}")),
            ),
        };

        Ok(Self {
            project_root,
            cache_file,
            cache,
            compiler,
            load_warning,
        })
    }

    /// The canonicalized project root this cycle builds.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Number of build cycles recorded against the cache so far.
    pub fn build_count(&self) -> u64 {
        self.cache.build_count
    }

    /// Runs one build cycle.
    ///
    /// With `force` set, every discovered file is compiled regardless of the
    /// cache. A single file's compile failure never aborts the cycle; the
    /// report carries the aggregate counts.
    pub fn run(&mut self, force: bool) -> Result<BuildReport, BuildError> {
        let mut report = BuildReport::default();
        if let Some(warning) = self.load_warning.take() {
            report.warnings.push(warning);
        }

        let sources = find_source_files(&self.project_root)?;
        let hashes = SourceHasher::hash_files(&sources);
        let change_set = SourceHasher::detect_changes(&hashes, &self.cache);

        // Files gone from disk no longer belong in the digest map.
        for deleted in &change_set.deleted_files {
            self.cache.file_hashes.remove(deleted);
            self.cache.dependencies.remove(deleted);
        }

        // The graph is recomputed in full every cycle; only change
        // detection is incremental.
        let graph_result = graph::build_graph(&self.project_root, &sources);
        self.cache.dependencies = graph_result.graph.edges.clone();
        report.unresolved_imports = graph_result.unresolved;
        for unreadable in &graph_result.unreadable {
            report
                .warnings
                .push(format!("could not scan imports in {}", unreadable.display()));
        }

        let to_rebuild: Vec<PathBuf> = if force {
            sources.clone()
        } else {
            let changed: BTreeSet<PathBuf> = change_set.dirty_files().into_iter().collect();
            graph_result.graph.rebuild_set(&changed).into_iter().collect()
        };

        if to_rebuild.is_empty() {
            report.messages.push("No files to build".to_string());
            return Ok(report);
        }

        for file in &to_rebuild {
            let outcome = self.compiler.compile(file);
            if outcome.success {
                // Record the digest only after a successful compile; a
                // failed file keeps its stale digest and retries next run.
                if let Some(hash) = hashes.get(file) {
                    self.cache.record_success(file, *hash);
                }
                report.succeeded += 1;
            } else {
                report.failed += 1;
            }
            report.messages.push(outcome.message);
        }
        report.rebuilt = to_rebuild;

        self.cache.stamp(now_rfc3339());
        if let Err(e) = self.cache.save(&self.cache_file) {
            // Availability over strict correctness: a failed save costs a
            // rebuild next time, not this build's results.
            report.warnings.push(format!("failed to save build cache: {e}"));
        }

        Ok(report)
    }
}

/// Recursively discovers `.poh` source files under `root`, sorted.
///
/// Hidden directories (including `.plhub`) and the `build/` output
/// directory are skipped.
pub fn find_source_files(root: &Path) -> Result<Vec<PathBuf>, BuildError> {
    let mut files = Vec::new();
    walk(root, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), BuildError> {
    let entries = std::fs::read_dir(dir).map_err(|e| BuildError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;
    for entry in entries {
        let entry = entry.map_err(|e| BuildError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if path.is_dir() {
            if name.starts_with('.') || name == "build" {
                continue;
            }
            walk(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "poh") {
            files.push(path);
        }
    }
    Ok(())
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}
