//! Import declaration extraction from PohLang source files.

use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::CacheError;

/// Extracts the import targets declared in a `.poh` source file.
///
/// A line declares an import if, after trimming, it starts with `Import` or
/// `import` (case-permissive on the first letter only). The first
/// double-quoted substring on the line is the import path, taken verbatim.
/// Duplicates are kept in declaration order. Lines that cannot be decoded
/// are skipped and extraction continues; only failing to open the file is an
/// error.
pub fn extract_imports(path: &Path) -> Result<Vec<String>, CacheError> {
    let file = std::fs::File::open(path).map_err(|e| CacheError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut imports = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = match line {
            Ok(line) => line,
            Err(_) => continue,
        };
        let trimmed = line.trim();
        if !(trimmed.starts_with("Import") || trimmed.starts_with("import")) {
            continue;
        }
        if let Some(target) = first_quoted(trimmed) {
            imports.push(target.to_string());
        }
    }
    Ok(imports)
}

/// Returns the first `"`-delimited substring of `line`, if any.
fn first_quoted(line: &str) -> Option<&str> {
    let mut parts = line.split('"');
    parts.next()?;
    parts.next()
}
