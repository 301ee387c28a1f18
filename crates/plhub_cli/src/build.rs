//! `plhub build` — incremental builds, watch mode, and the Dart passthrough
//! target.

use std::path::{Path, PathBuf};

use plhub_build::{
    plhub_root, watch, BuildCycle, BuildReport, CommandRunner, DefaultCommandRunner, WatchOptions,
};
use plhub_common::exit;
use plhub_config::{find_project_root, load_manifest};

use crate::{BuildArgs, BuildTarget, GlobalArgs};

/// Runs the `plhub build` command.
///
/// Resolves the enclosing project, then either runs the incremental
/// bytecode build cycle (optionally staying resident in watch mode) or
/// hands the project's main file to the external Dart transpiler.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let project_root = find_project_root(&cwd)?;

    match args.target {
        BuildTarget::Bytecode => bytecode_build(&project_root, args, global),
        BuildTarget::Dart => dart_build(&project_root, global),
    }
}

/// Runs the incremental build cycle, then optionally enters watch mode.
fn bytecode_build(
    project_root: &Path,
    args: &BuildArgs,
    global: &GlobalArgs,
) -> Result<i32, Box<dyn std::error::Error>> {
    let mut cycle = BuildCycle::new(project_root, &plhub_root())?;
    let report = cycle.run(args.force)?;
    print_report(&report, global);

    if args.watch {
        eprintln!(
            "   Watching for changes in {} (Ctrl+C to stop)",
            cycle.project_root().display()
        );
        watch(&mut cycle, WatchOptions::default(), |changed, report| {
            eprintln!("   Changes detected: {changed} file(s)");
            print_report(report, global);
            eprintln!("   Watching for changes...");
        })?;
        return Ok(exit::SUCCESS);
    }

    Ok(if report.success() {
        exit::SUCCESS
    } else {
        exit::FAILURE
    })
}

/// Prints warnings, per-file messages, and the cycle summary.
fn print_report(report: &BuildReport, global: &GlobalArgs) {
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
    for unresolved in &report.unresolved_imports {
        eprintln!(
            "warning: unresolved import \"{}\" in {}",
            unresolved.import,
            unresolved.file.display()
        );
    }
    if global.verbose {
        for message in &report.messages {
            eprintln!("   {message}");
        }
    }
    eprintln!("   {}", report.summary());
}

/// Transpiles the project's main file via the external Dart toolchain.
///
/// Mirrors the bytecode path's error posture: a missing transpiler or a
/// missing `dart` binary is a user-facing failure, not a crash.
fn dart_build(
    project_root: &Path,
    global: &GlobalArgs,
) -> Result<i32, Box<dyn std::error::Error>> {
    let manifest = load_manifest(project_root)?;
    let main_file = project_root.join(&manifest.main);
    if !main_file.exists() {
        eprintln!("error: main file '{}' not found", manifest.main);
        return Ok(exit::FAILURE);
    }

    let Some(transpiler) = transpiler_path(&plhub_root()) else {
        eprintln!("error: PohLang Dart transpiler not found; run 'plhub release' to bundle it");
        return Ok(exit::FAILURE);
    };

    if global.verbose {
        eprintln!("   Transpiling {} via {}", manifest.main, transpiler.display());
    }

    let runner = DefaultCommandRunner;
    let args = vec![
        "run".to_string(),
        transpiler.display().to_string(),
        main_file.display().to_string(),
        "--no-run".to_string(),
    ];
    match runner.run(project_root, Path::new("dart"), &args) {
        Ok(out) if out.success() => {
            eprintln!("   Dart build completed");
            Ok(exit::SUCCESS)
        }
        Ok(out) => {
            eprintln!("error: dart build failed:\n{}{}", out.stdout, out.stderr);
            Ok(exit::FAILURE)
        }
        Err(_) => {
            eprintln!("error: 'dart' command not found; install the Dart SDK or use --target bytecode");
            Ok(exit::FAILURE)
        }
    }
}

/// Returns the bundled Dart transpiler entry point, if present.
fn transpiler_path(plhub_root: &Path) -> Option<PathBuf> {
    let bundled = plhub_root.join("runtime").join("bin").join("pohlang.dart");
    bundled.is_file().then_some(bundled)
}
