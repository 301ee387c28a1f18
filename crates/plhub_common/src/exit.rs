//! Process exit codes shared across the PLHub CLI.
//!
//! The codes follow the conventions of the original PohLang tooling:
//! sysexits-style 64/70 for usage and runtime failures, 130 for interrupt.

/// The command completed successfully.
pub const SUCCESS: i32 = 0;

/// A generic failure (missing file, failed build, failed release step).
pub const FAILURE: i32 = 1;

/// No command was given; help text was printed instead.
pub const NO_COMMAND: i32 = 2;

/// The invocation was well-formed but requested something unsupported.
pub const USAGE: i32 = 64;

/// The external runtime reported an error while executing a program.
pub const RUNTIME_ERROR: i32 = 70;

/// The process was interrupted (Ctrl+C during watch mode).
pub const INTERRUPT: i32 = 130;
