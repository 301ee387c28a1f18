//! Project manifest loading for PLHub (`plhub.json`).

#![warn(missing_docs)]

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::{
    find_project_root, load_manifest, load_manifest_from_str, save_manifest, MANIFEST_FILE,
};
pub use types::ProjectManifest;
