//! `plhub release` — the release pipeline.
//!
//! Distilled from the original automation: verify a clean working tree, run
//! the test suite, stage a distributable SDK layout (runtime binary plus a
//! release manifest), then create and push the git tag. `--dry-run` prints
//! every step and executes nothing.

use std::path::{Path, PathBuf};

use plhub_build::{locate_runtime, CommandRunner, DefaultCommandRunner};
use plhub_common::exit;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::{GlobalArgs, ReleaseArgs};

/// Runs the `plhub release` command.
pub fn run(args: &ReleaseArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let pipeline = ReleasePipeline::new(plhub_build::plhub_root(), env!("CARGO_PKG_VERSION"), args);
    pipeline.execute(global)
}

/// One release invocation: all settings resolved up front, steps run in a
/// fixed order, any step failure aborts the remainder.
pub struct ReleasePipeline {
    plhub_root: PathBuf,
    version: String,
    tag: String,
    dry_run: bool,
    no_push: bool,
    skip_tests: bool,
    runner: Box<dyn CommandRunner>,
}

impl ReleasePipeline {
    /// Creates a pipeline from CLI arguments.
    pub fn new(plhub_root: PathBuf, version: &str, args: &ReleaseArgs) -> Self {
        Self::with_runner(plhub_root, version, args, Box::new(DefaultCommandRunner))
    }

    /// Creates a pipeline with a custom command runner (used in tests).
    pub fn with_runner(
        plhub_root: PathBuf,
        version: &str,
        args: &ReleaseArgs,
        runner: Box<dyn CommandRunner>,
    ) -> Self {
        Self {
            plhub_root,
            version: version.to_string(),
            tag: args.tag.clone().unwrap_or_else(|| default_tag(version)),
            dry_run: args.dry_run,
            no_push: args.no_push,
            skip_tests: args.skip_tests,
            runner,
        }
    }

    /// Executes the pipeline steps in order.
    pub fn execute(&self, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
        eprintln!("   Releasing PL-Hub v{} (tag {})", self.version, self.tag);

        self.check_clean_tree()?;
        self.run_tests()?;
        self.stage_sdk(global)?;
        self.tag_and_push()?;

        eprintln!("   Release complete.");
        Ok(exit::SUCCESS)
    }

    /// Fails if the git working tree has uncommitted changes.
    fn check_clean_tree(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.dry_run {
            eprintln!("   DRY RUN: would verify the working tree is clean");
            return Ok(());
        }
        let out = self.runner.run(
            &self.plhub_root,
            Path::new("git"),
            &["status".to_string(), "--porcelain".to_string()],
        )?;
        if !out.success() {
            return Err("git status failed; is this a git repository?".into());
        }
        if !is_tree_clean(&out.stdout) {
            return Err("working tree has uncommitted changes; commit or stash first".into());
        }
        eprintln!("   Working tree clean");
        Ok(())
    }

    /// Runs the test suite unless skipped.
    fn run_tests(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.skip_tests {
            eprintln!("   Skipping tests (--skip-tests)");
            return Ok(());
        }
        if self.dry_run {
            eprintln!("   DRY RUN: would run the test suite");
            return Ok(());
        }
        let out = self.runner.run(
            &self.plhub_root,
            Path::new("cargo"),
            &["test".to_string(), "--workspace".to_string()],
        )?;
        if !out.success() {
            return Err("test suite failed; release aborted".into());
        }
        eprintln!("   Tests passed");
        Ok(())
    }

    /// Stages the SDK layout under `dist/plhub-sdk-<version>/`.
    ///
    /// Copies the bundled runtime binary and writes a release manifest with
    /// the version, tag, and creation timestamp.
    fn stage_sdk(&self, global: &GlobalArgs) -> Result<(), Box<dyn std::error::Error>> {
        let dist = self
            .plhub_root
            .join("dist")
            .join(format!("plhub-sdk-{}", self.version));

        let runtime = locate_runtime(&self.plhub_root);
        if self.dry_run {
            eprintln!("   DRY RUN: would stage SDK into {}", dist.display());
            if runtime.is_none() {
                eprintln!("warning: PohLang runtime not found; staging would fail");
            }
            return Ok(());
        }

        let runtime =
            runtime.ok_or("PohLang runtime not found; cannot stage SDK without a runtime")?;
        std::fs::create_dir_all(dist.join("bin"))?;
        let target = dist.join("bin").join(
            runtime
                .file_name()
                .ok_or("runtime path has no file name")?,
        );
        std::fs::copy(&runtime, &target)?;

        let info = serde_json::json!({
            "name": "plhub-sdk",
            "version": self.version,
            "tag": self.tag,
            "created": now_rfc3339(),
        });
        std::fs::write(
            dist.join("release.json"),
            serde_json::to_string_pretty(&info)?,
        )?;

        if global.verbose {
            eprintln!("   Staged runtime {}", target.display());
        }
        eprintln!("   SDK staged at {}", dist.display());
        Ok(())
    }

    /// Creates the annotated tag and pushes it unless suppressed.
    fn tag_and_push(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.dry_run {
            eprintln!("   DRY RUN: would create git tag {}", self.tag);
            if !self.no_push {
                eprintln!("   DRY RUN: would push {} to origin", self.tag);
            }
            return Ok(());
        }

        let out = self.runner.run(
            &self.plhub_root,
            Path::new("git"),
            &[
                "tag".to_string(),
                "-a".to_string(),
                self.tag.clone(),
                "-m".to_string(),
                format!("PL-Hub {}", self.version),
            ],
        )?;
        if !out.success() {
            return Err(format!("failed to create tag {}: {}", self.tag, out.stderr.trim()).into());
        }
        eprintln!("   Created tag {}", self.tag);

        if self.no_push {
            eprintln!("   Skipping push (--no-push)");
            return Ok(());
        }
        let out = self.runner.run(
            &self.plhub_root,
            Path::new("git"),
            &["push".to_string(), "origin".to_string(), self.tag.clone()],
        )?;
        if !out.success() {
            return Err(format!("failed to push tag: {}", out.stderr.trim()).into());
        }
        eprintln!("   Pushed {}", self.tag);
        Ok(())
    }
}

/// The default tag for a version: `v<version>`.
fn default_tag(version: &str) -> String {
    format!("v{version}")
}

/// A porcelain status with no entries means a clean tree.
fn is_tree_clean(porcelain: &str) -> bool {
    porcelain.trim().is_empty()
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use plhub_build::CommandOutput;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Scripts per-program outcomes and records every invocation.
    #[derive(Debug, Clone, Default)]
    struct FakeRunner {
        outcomes: HashMap<String, CommandOutput>,
        calls: Arc<Mutex<Vec<(String, Vec<String>)>>>,
    }

    impl FakeRunner {
        fn script(mut self, program: &str, status: i32, stdout: &str) -> Self {
            self.outcomes.insert(
                program.to_string(),
                CommandOutput {
                    status,
                    stdout: stdout.to_string(),
                    stderr: String::new(),
                },
            );
            self
        }

        fn calls(&self) -> Vec<(String, Vec<String>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl CommandRunner for FakeRunner {
        fn run(
            &self,
            _cwd: &Path,
            program: &Path,
            args: &[String],
        ) -> std::io::Result<CommandOutput> {
            let name = program.display().to_string();
            self.calls.lock().unwrap().push((name.clone(), args.to_vec()));
            Ok(self.outcomes.get(&name).cloned().unwrap_or(CommandOutput {
                status: 0,
                stdout: String::new(),
                stderr: String::new(),
            }))
        }
    }

    fn release_args(dry_run: bool, no_push: bool, skip_tests: bool) -> ReleaseArgs {
        ReleaseArgs {
            dry_run,
            no_push,
            tag: None,
            skip_tests,
        }
    }

    fn global() -> GlobalArgs {
        GlobalArgs { verbose: false }
    }

    fn bundled_runtime_root() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let exe = if cfg!(windows) { "pohlang.exe" } else { "pohlang" };
        let bin = dir.path().join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::write(bin.join(exe), "binary bytes").unwrap();
        dir
    }

    #[test]
    fn default_tag_prefixes_v() {
        assert_eq!(default_tag("0.5.0"), "v0.5.0");
    }

    #[test]
    fn explicit_tag_overrides_default() {
        let args = ReleaseArgs {
            tag: Some("v9.9.9-rc1".to_string()),
            ..release_args(true, false, false)
        };
        let pipeline = ReleasePipeline::with_runner(
            PathBuf::from("/tmp"),
            "0.5.0",
            &args,
            Box::new(FakeRunner::default()),
        );
        assert_eq!(pipeline.tag, "v9.9.9-rc1");
    }

    #[test]
    fn tree_clean_detection() {
        assert!(is_tree_clean(""));
        assert!(is_tree_clean("\n"));
        assert!(!is_tree_clean(" M src/main.rs\n"));
        assert!(!is_tree_clean("?? new_file\n"));
    }

    #[test]
    fn dry_run_invokes_no_commands() {
        let runner = FakeRunner::default();
        let pipeline = ReleasePipeline::with_runner(
            PathBuf::from("/tmp/plhub"),
            "0.5.0",
            &release_args(true, false, false),
            Box::new(runner.clone()),
        );
        let code = pipeline.execute(&global()).unwrap();
        assert_eq!(code, exit::SUCCESS);
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn full_release_runs_steps_in_order() {
        let root = bundled_runtime_root();
        let runner = FakeRunner::default();
        let pipeline = ReleasePipeline::with_runner(
            root.path().to_path_buf(),
            "0.5.0",
            &release_args(false, false, false),
            Box::new(runner.clone()),
        );
        pipeline.execute(&global()).unwrap();

        let programs: Vec<String> = runner.calls().into_iter().map(|(p, _)| p).collect();
        assert_eq!(programs, vec!["git", "cargo", "git", "git"]);

        let dist = root.path().join("dist").join("plhub-sdk-0.5.0");
        assert!(dist.join("release.json").exists());
        assert!(dist.join("bin").read_dir().unwrap().next().is_some());
    }

    #[test]
    fn dirty_tree_aborts() {
        let runner = FakeRunner::default().script("git", 0, " M plhub.py\n");
        let pipeline = ReleasePipeline::with_runner(
            PathBuf::from("/tmp/plhub"),
            "0.5.0",
            &release_args(false, false, false),
            Box::new(runner),
        );
        let err = pipeline.execute(&global()).unwrap_err();
        assert!(err.to_string().contains("uncommitted changes"));
    }

    #[test]
    fn failing_tests_abort() {
        let root = bundled_runtime_root();
        let runner = FakeRunner::default().script("cargo", 101, "");
        let pipeline = ReleasePipeline::with_runner(
            root.path().to_path_buf(),
            "0.5.0",
            &release_args(false, false, false),
            Box::new(runner),
        );
        let err = pipeline.execute(&global()).unwrap_err();
        assert!(err.to_string().contains("test suite failed"));
    }

    #[test]
    fn skip_tests_skips_cargo() {
        let root = bundled_runtime_root();
        let runner = FakeRunner::default();
        let pipeline = ReleasePipeline::with_runner(
            root.path().to_path_buf(),
            "0.5.0",
            &release_args(false, false, true),
            Box::new(runner.clone()),
        );
        pipeline.execute(&global()).unwrap();

        assert!(runner.calls().iter().all(|(p, _)| p != "cargo"));
    }

    #[test]
    fn no_push_skips_push() {
        let root = bundled_runtime_root();
        let runner = FakeRunner::default();
        let pipeline = ReleasePipeline::with_runner(
            root.path().to_path_buf(),
            "0.5.0",
            &release_args(false, true, false),
            Box::new(runner.clone()),
        );
        pipeline.execute(&global()).unwrap();

        let git_args: Vec<Vec<String>> = runner
            .calls()
            .into_iter()
            .filter(|(p, _)| p == "git")
            .map(|(_, a)| a)
            .collect();
        assert!(git_args.iter().all(|a| a[0] != "push"));
    }

    #[test]
    fn missing_runtime_fails_staging() {
        let dir = tempfile::tempdir().unwrap();
        let runner = FakeRunner::default();
        let pipeline = ReleasePipeline::with_runner(
            dir.path().to_path_buf(),
            "0.5.0",
            &release_args(false, false, true),
            Box::new(runner),
        );
        let err = pipeline.execute(&global()).unwrap_err();
        assert!(err.to_string().contains("runtime not found"));
    }
}
