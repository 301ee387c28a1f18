//! `plhub create` — project scaffolding command.
//!
//! Creates a new PohLang project directory with the standard layout:
//! `src/`, `tests/`, a `plhub.json` manifest, a templated `src/main.poh`,
//! and a `README.md`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use plhub_common::exit;
use plhub_config::{save_manifest, ProjectManifest};

use crate::{CreateArgs, GlobalArgs, Template};

/// Runs the `plhub create` command.
///
/// Creates a subdirectory named after the project. Fails if the directory
/// already exists. Returns exit code 0 on success.
pub fn run(args: &CreateArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = PathBuf::from(&args.name);
    if project_dir.exists() {
        return Err(format!("directory '{}' already exists", args.name).into());
    }

    if global.verbose {
        eprintln!(
            "   Creating PohLang project '{}' with template '{:?}'",
            args.name, args.template
        );
    }

    scaffold(&project_dir, &args.name, args.template)?;

    eprintln!("   Created project '{}'", args.name);
    eprintln!("     {}", project_dir.join("plhub.json").display());
    eprintln!("     {}", project_dir.join("src").join("main.poh").display());
    eprintln!("   To run: cd {} && plhub run src/main.poh", args.name);

    Ok(exit::SUCCESS)
}

/// Creates the project directories and files.
fn scaffold(project_dir: &Path, name: &str, template: Template) -> io::Result<()> {
    fs::create_dir_all(project_dir.join("src"))?;
    fs::create_dir_all(project_dir.join("tests"))?;

    let manifest = ProjectManifest::new(name);
    save_manifest(&manifest, project_dir)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    fs::write(
        project_dir.join("src").join("main.poh"),
        template_content(template),
    )?;
    fs::write(project_dir.join("README.md"), readme_content(name))?;

    Ok(())
}

/// Returns the `src/main.poh` content for a template.
fn template_content(template: Template) -> &'static str {
    match template {
        Template::Basic => {
            r#"# Basic PohLang Program
Write "Hello from PohLang!"
Write "This is a basic project template."
"#
        }
        Template::Console => {
            r#"# Console Application Template
Write "Welcome to your PohLang console application!"
Write ""

Ask for name
Write "Hello " plus name plus "!"

Set count to 0
Repeat 3
    Set count to count plus 1
    Write "Loop iteration: " plus count
End

Write ""
Write "Thanks for using PohLang!"
"#
        }
        Template::Web => {
            r#"# Web Application Template (Experimental)
Write "Web application features coming soon!"
Write "For now, this is a placeholder."
"#
        }
    }
}

/// Returns the README content for a new project.
fn readme_content(name: &str) -> String {
    format!(
        r#"# {name}

A PohLang project created with PL-Hub.

## Running

```bash
cd {name}
plhub run src/main.poh
```

## Building

```bash
plhub build
```
"#
    )
}
