//! Dependency graph construction and rebuild-set expansion.
//!
//! Import strings are resolved to file identities using a two-step policy:
//! relative to the importing file's directory first, then relative to the
//! project root. The first match wins. Resolved paths are canonicalized so
//! the graph and the digest map agree on file identity.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::imports::extract_imports;

/// An import string that resolved under neither lookup rule.
///
/// No edge is recorded for it; the build proceeds, but callers are expected
/// to surface these as warnings so a typo in an import path is visible
/// instead of silently producing stale dependents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedImport {
    /// The file containing the import declaration.
    pub file: PathBuf,
    /// The import string as written in source.
    pub import: String,
}

/// Mapping from each source file to its direct dependencies.
///
/// Recomputed in full on every build; only change detection is incremental.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Direct dependency edges (file to the files it imports).
    pub edges: BTreeMap<PathBuf, Vec<PathBuf>>,
}

impl DependencyGraph {
    /// Returns the direct dependencies of `file`.
    pub fn dependencies_of(&self, file: &Path) -> &[PathBuf] {
        self.edges.get(file).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Expands a set of changed files to the full set that must be rebuilt.
    ///
    /// Runs a fixed-point iteration over reverse edges: any file depending
    /// (directly or transitively) on a member of the set joins it. The
    /// result is therefore closed under "depends on a changed file", not
    /// just one hop deep.
    pub fn rebuild_set(&self, changed: &BTreeSet<PathBuf>) -> BTreeSet<PathBuf> {
        let mut result = changed.clone();
        loop {
            let mut grew = false;
            for (file, deps) in &self.edges {
                if result.contains(file) {
                    continue;
                }
                if deps.iter().any(|dep| result.contains(dep)) {
                    result.insert(file.clone());
                    grew = true;
                }
            }
            if !grew {
                return result;
            }
        }
    }
}

/// Outcome of scanning a file set for imports.
#[derive(Debug, Default)]
pub struct GraphResult {
    /// The assembled dependency graph.
    pub graph: DependencyGraph,
    /// Import strings that resolved to no existing file.
    pub unresolved: Vec<UnresolvedImport>,
    /// Source files whose import scan failed outright (unreadable file).
    pub unreadable: Vec<PathBuf>,
}

/// Builds the dependency graph for `files` within `project_root`.
///
/// Every file gets an entry, even with no imports, so the graph doubles as
/// the record of what was scanned. An unreadable file contributes an empty
/// edge list and is reported in [`GraphResult::unreadable`].
pub fn build_graph(project_root: &Path, files: &[PathBuf]) -> GraphResult {
    let mut result = GraphResult::default();

    for file in files {
        let imports = match extract_imports(file) {
            Ok(imports) => imports,
            Err(_) => {
                result.unreadable.push(file.clone());
                result.graph.edges.insert(file.clone(), Vec::new());
                continue;
            }
        };

        let mut deps = Vec::new();
        for import in imports {
            match resolve_import(&import, file, project_root) {
                Some(resolved) => deps.push(resolved),
                None => result.unresolved.push(UnresolvedImport {
                    file: file.clone(),
                    import,
                }),
            }
        }
        result.graph.edges.insert(file.clone(), deps);
    }

    result
}

/// Resolves one import string to an existing file.
///
/// Tries the importing file's directory, then the project root; the first
/// existing match wins. Returns the canonicalized path, or `None` if
/// neither location has the file.
fn resolve_import(import: &str, source: &Path, project_root: &Path) -> Option<PathBuf> {
    if let Some(dir) = source.parent() {
        let candidate = dir.join(import);
        if candidate.exists() {
            return std::fs::canonicalize(&candidate).ok();
        }
    }
    let candidate = project_root.join(import);
    if candidate.exists() {
        return std::fs::canonicalize(&candidate).ok();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Project {
        _dir: tempfile::TempDir,
        root: PathBuf,
    }

    impl Project {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let root = std::fs::canonicalize(dir.path()).unwrap();
            Self { _dir: dir, root }
        }

        fn write(&self, rel: &str, content: &str) -> PathBuf {
            let path = self.root.join(rel);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(&path, content).unwrap();
            path
        }
    }

    #[test]
    fn file_with_no_imports_gets_empty_entry() {
        let p = Project::new();
        let main = p.write("src/main.poh", "Write \"hi\"\n");

        let result = build_graph(&p.root, &[main.clone()]);
        assert_eq!(result.graph.dependencies_of(&main), &[] as &[PathBuf]);
        assert!(result.unresolved.is_empty());
    }

    #[test]
    fn resolves_relative_to_source_directory() {
        let p = Project::new();
        let util = p.write("src/util.poh", "Write \"util\"\n");
        let main = p.write("src/main.poh", "Import \"util.poh\"\n");

        let result = build_graph(&p.root, &[main.clone(), util.clone()]);
        assert_eq!(result.graph.dependencies_of(&main), &[util]);
    }

    #[test]
    fn falls_back_to_project_root() {
        let p = Project::new();
        let shared = p.write("lib/shared.poh", "Write \"shared\"\n");
        let main = p.write("src/main.poh", "Import \"lib/shared.poh\"\n");

        let result = build_graph(&p.root, &[main.clone(), shared.clone()]);
        assert_eq!(result.graph.dependencies_of(&main), &[shared]);
    }

    #[test]
    fn source_directory_wins_over_root() {
        let p = Project::new();
        // Same relative name exists both next to the source and at the root.
        let local = p.write("src/util.poh", "Write \"local\"\n");
        p.write("util.poh", "Write \"root\"\n");
        let main = p.write("src/main.poh", "Import \"util.poh\"\n");

        let result = build_graph(&p.root, &[main.clone()]);
        assert_eq!(result.graph.dependencies_of(&main), &[local]);
    }

    #[test]
    fn unresolved_import_recorded_without_edge() {
        let p = Project::new();
        let main = p.write("src/main.poh", "Import \"no_such_file.poh\"\n");

        let result = build_graph(&p.root, &[main.clone()]);
        assert_eq!(result.graph.dependencies_of(&main), &[] as &[PathBuf]);
        assert_eq!(
            result.unresolved,
            vec![UnresolvedImport {
                file: main,
                import: "no_such_file.poh".to_string(),
            }]
        );
    }

    #[test]
    fn unreadable_file_reported() {
        let p = Project::new();
        let ghost = p.root.join("src/ghost.poh");

        let result = build_graph(&p.root, &[ghost.clone()]);
        assert_eq!(result.unreadable, vec![ghost.clone()]);
        assert_eq!(result.graph.dependencies_of(&ghost), &[] as &[PathBuf]);
    }

    #[test]
    fn rebuild_set_includes_direct_dependents() {
        let p = Project::new();
        let util = p.write("src/util.poh", "Write \"util\"\n");
        let main = p.write("src/main.poh", "Import \"util.poh\"\n");

        let result = build_graph(&p.root, &[main.clone(), util.clone()]);
        let changed = BTreeSet::from([util.clone()]);
        let rebuild = result.graph.rebuild_set(&changed);

        assert_eq!(rebuild, BTreeSet::from([util, main]));
    }

    #[test]
    fn rebuild_set_excludes_non_dependents() {
        let p = Project::new();
        let util = p.write("src/util.poh", "Write \"util\"\n");
        let main = p.write("src/main.poh", "Import \"util.poh\"\n");

        let result = build_graph(&p.root, &[main.clone(), util.clone()]);
        // main depends on util, not the reverse: editing main rebuilds only main.
        let changed = BTreeSet::from([main.clone()]);
        let rebuild = result.graph.rebuild_set(&changed);

        assert_eq!(rebuild, BTreeSet::from([main]));
    }

    #[test]
    fn rebuild_set_propagates_multiple_hops() {
        let p = Project::new();
        let c = p.write("src/c.poh", "Write \"c\"\n");
        let b = p.write("src/b.poh", "Import \"c.poh\"\n");
        let a = p.write("src/a.poh", "Import \"b.poh\"\n");

        let result = build_graph(&p.root, &[a.clone(), b.clone(), c.clone()]);
        let changed = BTreeSet::from([c.clone()]);
        let rebuild = result.graph.rebuild_set(&changed);

        assert_eq!(rebuild, BTreeSet::from([a, b, c]));
    }

    #[test]
    fn rebuild_set_handles_import_cycles() {
        let p = Project::new();
        let a = p.write("src/a.poh", "Import \"b.poh\"\n");
        let b = p.write("src/b.poh", "Import \"a.poh\"\n");

        let result = build_graph(&p.root, &[a.clone(), b.clone()]);
        let changed = BTreeSet::from([a.clone()]);
        let rebuild = result.graph.rebuild_set(&changed);

        assert_eq!(rebuild, BTreeSet::from([a, b]));
    }

    #[test]
    fn duplicate_imports_produce_duplicate_edges() {
        let p = Project::new();
        let util = p.write("src/util.poh", "Write \"util\"\n");
        let main = p.write(
            "src/main.poh",
            "Import \"util.poh\"\nImport \"util.poh\"\n",
        );

        let result = build_graph(&p.root, &[main.clone()]);
        assert_eq!(result.graph.dependencies_of(&main), &[util.clone(), util]);
    }
}
