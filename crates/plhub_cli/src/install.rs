//! `plhub install` — record a dependency in the project manifest.
//!
//! There is no package registry yet; installing records the package under
//! `dependencies` with a caret version range, matching the original tool.

use std::path::Path;

use plhub_common::exit;
use plhub_config::{find_project_root, load_manifest, save_manifest, ConfigError};

use crate::{GlobalArgs, InstallArgs};

/// Default version range recorded for a newly installed package.
const DEFAULT_RANGE: &str = "^1.0.0";

/// Runs the `plhub install` command from the current directory.
pub fn run(args: &InstallArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let project_dir = match find_project_root(&cwd) {
        Ok(dir) => dir,
        Err(ConfigError::NotAProject(_)) => {
            eprintln!("error: not in a PohLang project directory");
            eprintln!("run 'plhub create <name>' to create a new project");
            return Ok(exit::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    install_package(&project_dir, &args.package)?;

    if global.verbose {
        eprintln!("   Updated {}", project_dir.join("plhub.json").display());
    }
    eprintln!("   Installed '{}' ({DEFAULT_RANGE})", args.package);
    Ok(exit::SUCCESS)
}

/// Adds `package` to the manifest in `project_dir` and saves it.
fn install_package(project_dir: &Path, package: &str) -> Result<(), ConfigError> {
    let mut manifest = load_manifest(project_dir)?;
    manifest
        .dependencies
        .insert(package.to_string(), DEFAULT_RANGE.to_string());
    save_manifest(&manifest, project_dir)
}
