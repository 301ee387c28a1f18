//! Subprocess execution seam.
//!
//! External tools (the PohLang runtime, `dart`, `git`) are invoked through
//! the [`CommandRunner`] trait so the compile and release paths can be
//! tested against a recording fake instead of real binaries.

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

/// Captured output of a finished subprocess.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code; `-1` if the process was terminated by a signal.
    pub status: i32,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// Returns `true` if the process exited with code zero.
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Runs an external program and captures its output.
pub trait CommandRunner: std::fmt::Debug {
    /// Runs `program` with `args` in `cwd`, waiting for completion.
    fn run(&self, cwd: &Path, program: &Path, args: &[String]) -> io::Result<CommandOutput>;
}

/// [`CommandRunner`] backed by [`std::process::Command`].
#[derive(Debug, Clone, Default)]
pub struct DefaultCommandRunner;

impl CommandRunner for DefaultCommandRunner {
    fn run(&self, cwd: &Path, program: &Path, args: &[String]) -> io::Result<CommandOutput> {
        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        Ok(CommandOutput {
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
