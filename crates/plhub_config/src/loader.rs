//! Manifest file loading, validation, and saving.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::types::ProjectManifest;

/// File name of the project manifest.
pub const MANIFEST_FILE: &str = "plhub.json";

/// Loads and validates the `plhub.json` manifest from a project directory.
pub fn load_manifest(project_dir: &Path) -> Result<ProjectManifest, ConfigError> {
    let path = project_dir.join(MANIFEST_FILE);
    let content = std::fs::read_to_string(&path)?;
    load_manifest_from_str(&content)
}

/// Parses and validates a manifest from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_manifest_from_str(content: &str) -> Result<ProjectManifest, ConfigError> {
    let manifest: ProjectManifest =
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_manifest(&manifest)?;
    Ok(manifest)
}

/// Serializes the manifest back to `plhub.json` in the project directory.
///
/// Used by `plhub install` to record new dependencies.
pub fn save_manifest(manifest: &ProjectManifest, project_dir: &Path) -> Result<(), ConfigError> {
    let json = serde_json::to_string_pretty(manifest)
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;
    std::fs::write(project_dir.join(MANIFEST_FILE), json)?;
    Ok(())
}

/// Walks up from `start` looking for the nearest directory containing
/// `plhub.json`.
///
/// Returns the directory containing the manifest, or an error if none is
/// found up to the filesystem root.
pub fn find_project_root(start: &Path) -> Result<PathBuf, ConfigError> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(MANIFEST_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(ConfigError::NotAProject(start.display().to_string()));
        }
    }
}

/// Validates that required fields are present.
fn validate_manifest(manifest: &ProjectManifest) -> Result<(), ConfigError> {
    if manifest.name.is_empty() {
        return Err(ConfigError::MissingField("name".to_string()));
    }
    if manifest.version.is_empty() {
        return Err(ConfigError::MissingField("version".to_string()));
    }
    if manifest.main.is_empty() {
        return Err(ConfigError::MissingField("main".to_string()));
    }
    Ok(())
}
