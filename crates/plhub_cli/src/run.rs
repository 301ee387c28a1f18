//! `plhub run` — execute a PohLang program via the external runtime.

use std::path::Path;

use plhub_build::{locate_runtime, plhub_root, run_program};
use plhub_common::exit;

use crate::{GlobalArgs, RunArgs};

/// Runs the `plhub run` command.
///
/// Validates the file, locates the runtime binary, and executes the program
/// with inherited stdio. Returns exit code 0 on success, 1 if the file or
/// runtime is missing, 70 if the runtime reports an error.
pub fn run(args: &RunArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let file = Path::new(&args.file);
    if !file.exists() {
        eprintln!("error: file '{}' not found", args.file);
        return Ok(exit::FAILURE);
    }
    if file.extension().map_or(true, |ext| ext != "poh") {
        eprintln!(
            "warning: file '{}' does not have .poh extension, proceeding anyway",
            args.file
        );
    }

    let Some(runtime) = locate_runtime(&plhub_root()) else {
        eprintln!("error: PohLang runtime not found; looked in runtime/bin, bin, and PATH");
        return Ok(exit::FAILURE);
    };

    if global.verbose {
        eprintln!("   Running {} via {}", args.file, runtime.display());
    }

    Ok(run_program(&runtime, file, args.debug)?)
}
