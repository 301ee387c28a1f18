//! `plhub list` — list bundled examples, templates, or project packages.

use std::path::Path;

use plhub_build::plhub_root;
use plhub_common::exit;
use plhub_config::{find_project_root, load_manifest, ProjectManifest};

use crate::{GlobalArgs, ListArgs, ListKind};

/// Runs the `plhub list` command.
pub fn run(args: &ListArgs, _global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    match args.what {
        ListKind::Examples => {
            for line in example_lines(&plhub_root().join("examples")) {
                println!("{line}");
            }
        }
        ListKind::Templates => {
            for line in template_lines() {
                println!("{line}");
            }
        }
        ListKind::Packages => {
            let cwd = std::env::current_dir()?;
            match find_project_root(&cwd) {
                Ok(dir) => {
                    let manifest = load_manifest(&dir)?;
                    for line in package_lines(&manifest) {
                        println!("{line}");
                    }
                }
                Err(_) => {
                    println!("Not in a PohLang project directory.");
                }
            }
        }
    }
    Ok(exit::SUCCESS)
}

/// Lines for `plhub list examples`: bundled `.poh` programs, sorted.
fn example_lines(examples_dir: &Path) -> Vec<String> {
    let mut programs: Vec<String> = std::fs::read_dir(examples_dir)
        .into_iter()
        .flatten()
        .flatten()
        .map(|entry| entry.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "poh"))
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();
    programs.sort();

    if programs.is_empty() {
        return vec!["No examples found.".to_string()];
    }
    let mut lines = vec!["Available example programs:".to_string()];
    lines.extend(programs.into_iter().map(|name| format!("  - {name}")));
    lines
}

/// Lines for `plhub list templates`.
fn template_lines() -> Vec<String> {
    vec![
        "Available project templates:".to_string(),
        "  - basic: Simple console application".to_string(),
        "  - console: Advanced console application with input/output".to_string(),
        "  - web: Web application template (experimental)".to_string(),
    ]
}

/// Lines for `plhub list packages`.
fn package_lines(manifest: &ProjectManifest) -> Vec<String> {
    if manifest.dependencies.is_empty() {
        return vec![
            "Installed packages:".to_string(),
            "  No packages installed.".to_string(),
        ];
    }
    let mut lines = vec!["Installed packages:".to_string()];
    lines.extend(
        manifest
            .dependencies
            .iter()
            .map(|(name, version)| format!("  - {name}: {version}")),
    );
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn examples_listed_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("zeta.poh"), "").unwrap();
        std::fs::write(dir.path().join("alpha.poh"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();

        let lines = example_lines(dir.path());
        assert_eq!(
            lines,
            vec![
                "Available example programs:",
                "  - alpha.poh",
                "  - zeta.poh"
            ]
        );
    }

    #[test]
    fn missing_examples_dir_reports_none() {
        let dir = tempfile::tempdir().unwrap();
        let lines = example_lines(&dir.path().join("nonexistent"));
        assert_eq!(lines, vec!["No examples found."]);
    }

    #[test]
    fn templates_cover_all_variants() {
        let lines = template_lines();
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().any(|l| l.contains("basic")));
        assert!(lines.iter().any(|l| l.contains("console")));
        assert!(lines.iter().any(|l| l.contains("web")));
    }

    #[test]
    fn packages_listed_with_versions() {
        let mut manifest = ProjectManifest::new("demo");
        manifest
            .dependencies
            .insert("strings".to_string(), "^1.0.0".to_string());

        let lines = package_lines(&manifest);
        assert_eq!(lines[0], "Installed packages:");
        assert_eq!(lines[1], "  - strings: ^1.0.0");
    }

    #[test]
    fn empty_packages_reported() {
        let manifest = ProjectManifest::new("demo");
        let lines = package_lines(&manifest);
        assert!(lines[1].contains("No packages installed"));
    }
}
