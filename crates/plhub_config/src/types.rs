//! Manifest types deserialized from `plhub.json`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The project manifest parsed from `plhub.json`.
///
/// Records project metadata, the main entry file, and the dependency
/// name-to-version-range mappings maintained by `plhub install`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectManifest {
    /// The project name.
    pub name: String,
    /// The project version string.
    pub version: String,
    /// A brief description of the project.
    #[serde(default)]
    pub description: String,
    /// Path to the main entry file, relative to the project root.
    #[serde(default = "default_main")]
    pub main: String,
    /// Package dependencies (name to version range).
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    /// Development-only dependencies (name to version range).
    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, String>,
}

fn default_main() -> String {
    "src/main.poh".to_string()
}

impl ProjectManifest {
    /// Creates a manifest with the defaults used by `plhub create`.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            version: "1.0.0".to_string(),
            description: format!("A PohLang project: {name}"),
            main: default_main(),
            dependencies: BTreeMap::new(),
            dev_dependencies: BTreeMap::new(),
        }
    }
}
