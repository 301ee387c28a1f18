//! Locating and invoking the external PohLang runtime binary.
//!
//! The runtime is distributed separately and dropped into the PLHub
//! installation (`runtime/bin/` or `bin/`), or made available on `PATH`.
//! PLHub never produces runtime artifacts itself; it only shells out.

use std::path::{Path, PathBuf};
use std::process::Command;

use plhub_common::exit;

use crate::error::BuildError;

/// Platform-specific file name of the runtime executable.
fn executable_name() -> &'static str {
    if cfg!(windows) {
        "pohlang.exe"
    } else {
        "pohlang"
    }
}

/// Returns the PLHub installation root.
///
/// `PLHUB_HOME` overrides everything; otherwise the directory containing
/// the current executable is used, falling back to the current directory.
pub fn plhub_root() -> PathBuf {
    if let Some(home) = std::env::var_os("PLHUB_HOME") {
        return PathBuf::from(home);
    }
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Locates the PohLang runtime binary.
///
/// Checks the fixed install locations under `plhub_root` first
/// (`runtime/bin/`, then `bin/`), then every entry on `PATH`. Returns the
/// first existing candidate.
pub fn locate_runtime(plhub_root: &Path) -> Option<PathBuf> {
    let exe = executable_name();
    let mut candidates = vec![
        plhub_root.join("runtime").join("bin").join(exe),
        plhub_root.join("bin").join(exe),
    ];

    if let Some(path_var) = std::env::var_os("PATH") {
        for dir in std::env::split_paths(&path_var) {
            candidates.push(dir.join(exe));
        }
    }

    candidates.into_iter().find(|c| c.is_file())
}

/// Runs a `.poh` program via the runtime, inheriting stdio.
///
/// Invokes `<runtime> --run <file>` (plus `--debug` when tracing is
/// requested) and maps the outcome to a process exit code: 0 on success,
/// 70 when the runtime reports an error.
pub fn run_program(runtime: &Path, file: &Path, debug: bool) -> Result<i32, BuildError> {
    let mut cmd = Command::new(runtime);
    cmd.arg("--run").arg(file);
    if debug {
        cmd.arg("--debug");
    }

    let status = cmd.status().map_err(|e| BuildError::Io {
        path: runtime.to_path_buf(),
        source: e,
    })?;

    if status.success() {
        Ok(exit::SUCCESS)
    } else {
        Ok(exit::RUNTIME_ERROR)
    }
}
