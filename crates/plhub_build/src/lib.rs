//! Build orchestration for PohLang projects: runtime discovery, compiler
//! invocation, the incremental build cycle, and debounced watch mode.

pub mod command;
pub mod compiler;
pub mod error;
pub mod pipeline;
pub mod runtime;
pub mod watch;

pub use command::{CommandOutput, CommandRunner, DefaultCommandRunner};
pub use compiler::{CompileOutcome, Compiler};
pub use error::BuildError;
pub use pipeline::{find_source_files, BuildCycle, BuildReport};
pub use runtime::{locate_runtime, plhub_root, run_program};
pub use watch::{watch, WatchOptions};
