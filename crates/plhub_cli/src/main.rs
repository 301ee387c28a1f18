//! PLHub CLI — the development environment for PohLang.
//!
//! Provides `plhub run` for executing programs, `plhub create` for project
//! scaffolding, `plhub install` for recording dependencies, `plhub build`
//! for incremental builds (with watch mode), `plhub list` for discovering
//! bundled assets, and `plhub release` for the release pipeline.

#![warn(missing_docs)]

mod build;
mod create;
mod install;
mod list;
mod release;
mod run;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use plhub_common::exit;

/// PL-Hub — the PohLang development environment.
#[derive(Parser, Debug)]
#[command(
    name = "plhub",
    version,
    about = "PL-Hub: PohLang Development Environment",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a PohLang program.
    Run(RunArgs),
    /// Create a new PohLang project.
    Create(CreateArgs),
    /// Record a package dependency in the project manifest.
    Install(InstallArgs),
    /// Build the current project incrementally.
    Build(BuildArgs),
    /// List available items.
    List(ListArgs),
    /// Run the PL-Hub release pipeline.
    Release(ReleaseArgs),
}

/// Arguments for the `plhub run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// PohLang file to run (`.poh` extension).
    pub file: String,

    /// Enable debug tracing in the runtime.
    #[arg(long)]
    pub debug: bool,
}

/// Arguments for the `plhub create` subcommand.
#[derive(Parser, Debug)]
pub struct CreateArgs {
    /// Project name (creates a subdirectory).
    pub name: String,

    /// Project template.
    #[arg(short, long, value_enum, default_value_t = Template::Basic)]
    pub template: Template,
}

/// Arguments for the `plhub install` subcommand.
#[derive(Parser, Debug)]
pub struct InstallArgs {
    /// Package name to install.
    pub package: String,
}

/// Arguments for the `plhub build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Build target.
    #[arg(short, long, value_enum, default_value_t = BuildTarget::Bytecode)]
    pub target: BuildTarget,

    /// Recompile every file, ignoring the build cache.
    #[arg(long)]
    pub force: bool,

    /// Stay running and rebuild on file changes.
    #[arg(long)]
    pub watch: bool,
}

/// Arguments for the `plhub list` subcommand.
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// What to list.
    #[arg(value_enum)]
    pub what: ListKind,
}

/// Arguments for the `plhub release` subcommand.
#[derive(Parser, Debug)]
pub struct ReleaseArgs {
    /// Print every step without executing side effects.
    #[arg(long)]
    pub dry_run: bool,

    /// Do not push the git tag to the remote.
    #[arg(long)]
    pub no_push: bool,

    /// Override the git tag name (default: `v<version>`).
    #[arg(long)]
    pub tag: Option<String>,

    /// Skip running the test suite before tagging.
    #[arg(long)]
    pub skip_tests: bool,
}

/// Project template selection for `plhub create`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Template {
    /// Simple console program.
    Basic,
    /// Console application with input/output.
    Console,
    /// Web application template (experimental).
    Web,
}

/// Output target for `plhub build`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum BuildTarget {
    /// Compile to bytecode via the PohLang runtime (default).
    Bytecode,
    /// Transpile via the external Dart toolchain.
    Dart,
}

/// Asset categories for `plhub list`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ListKind {
    /// Bundled example programs.
    Examples,
    /// Known project templates.
    Templates,
    /// Dependencies of the current project.
    Packages,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to print verbose progress information.
    pub verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        verbose: cli.verbose,
    };

    let result = match cli.command {
        Command::Run(ref args) => run::run(args, &global),
        Command::Create(ref args) => create::run(args, &global),
        Command::Install(ref args) => install::run(args, &global),
        Command::Build(ref args) => build::run(args, &global),
        Command::List(ref args) => list::run(args, &global),
        Command::Release(ref args) => release::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(exit::FAILURE);
        }
    }
}
