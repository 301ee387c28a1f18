//! Per-file invocation of the external PohLang compiler.

use std::path::{Path, PathBuf};

use crate::command::{CommandRunner, DefaultCommandRunner};

/// File extension of compiled bytecode artifacts.
const BYTECODE_EXT: &str = "pbc";

/// Result of compiling one source file.
///
/// Ephemeral; aggregated into the build report, never persisted.
#[derive(Debug, Clone)]
pub struct CompileOutcome {
    /// Whether the compiler exited with code zero.
    pub success: bool,
    /// Human-readable result line (success) or captured error text (failure).
    pub message: String,
}

/// Invokes the external runtime binary in compile mode, one file at a time.
///
/// The runtime may be absent: every compile then fails with a descriptive
/// message, and the wider build cycle still runs to completion so the
/// aggregate report shows exactly which files were affected.
#[derive(Debug)]
pub struct Compiler {
    runtime: Option<PathBuf>,
    project_root: PathBuf,
    runner: Box<dyn CommandRunner>,
}

impl Compiler {
    /// Creates a compiler for `project_root` using the runtime at `runtime`
    /// (or `None` if no runtime was located).
    pub fn new(runtime: Option<PathBuf>, project_root: &Path) -> Self {
        Self::with_runner(runtime, project_root, Box::new(DefaultCommandRunner))
    }

    /// Creates a compiler with a custom command runner (used in tests).
    pub fn with_runner(
        runtime: Option<PathBuf>,
        project_root: &Path,
        runner: Box<dyn CommandRunner>,
    ) -> Self {
        Self {
            runtime,
            project_root: project_root.to_path_buf(),
            runner,
        }
    }

    /// Returns `true` if a runtime binary was located.
    pub fn has_runtime(&self) -> bool {
        self.runtime.is_some()
    }

    /// Compiles `path` to its sibling `.pbc` artifact.
    ///
    /// Runs `<runtime> --compile <path> -o <output>` in the project root.
    /// Exit code zero is success; anything else is a failure carrying the
    /// compiler's stderr (or stdout) as the message.
    pub fn compile(&self, path: &Path) -> CompileOutcome {
        let Some(runtime) = &self.runtime else {
            return CompileOutcome {
                success: false,
                message: "PohLang runtime not found".to_string(),
            };
        };

        let output_file = path.with_extension(BYTECODE_EXT);
        let args = vec![
            "--compile".to_string(),
            path.display().to_string(),
            "-o".to_string(),
            output_file.display().to_string(),
        ];

        match self.runner.run(&self.project_root, runtime, &args) {
            Ok(out) if out.success() => CompileOutcome {
                success: true,
                message: format!(
                    "Compiled {} -> {}",
                    file_name(path),
                    file_name(&output_file)
                ),
            },
            Ok(out) => {
                let detail = if !out.stderr.trim().is_empty() {
                    out.stderr.trim().to_string()
                } else if !out.stdout.trim().is_empty() {
                    out.stdout.trim().to_string()
                } else {
                    "Unknown error".to_string()
                };
                CompileOutcome {
                    success: false,
                    message: format!("Compilation failed: {detail}"),
                }
            }
            Err(e) => CompileOutcome {
                success: false,
                message: format!("Failed to invoke compiler: {e}"),
            },
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
