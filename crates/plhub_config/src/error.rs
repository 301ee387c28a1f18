//! Error types for manifest loading and validation.

/// Errors that can occur when loading, validating, or saving a `plhub.json`
/// project manifest.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading or writing the manifest file.
    #[error("failed to read project manifest: {0}")]
    IoError(#[from] std::io::Error),

    /// The JSON content could not be parsed.
    #[error("failed to parse project manifest: {0}")]
    ParseError(String),

    /// A required field is missing or empty.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// No `plhub.json` was found in the directory or any of its parents.
    #[error("could not find plhub.json in {0} or any parent directory")]
    NotAProject(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_field() {
        let err = ConfigError::MissingField("name".to_string());
        assert_eq!(format!("{err}"), "missing required field: name");
    }

    #[test]
    fn display_parse_error() {
        let err = ConfigError::ParseError("expected value at line 3".to_string());
        assert_eq!(
            format!("{err}"),
            "failed to parse project manifest: expected value at line 3"
        );
    }

    #[test]
    fn display_not_a_project() {
        let err = ConfigError::NotAProject("/tmp/somewhere".to_string());
        let msg = format!("{err}");
        assert!(msg.contains("plhub.json"));
        assert!(msg.contains("/tmp/somewhere"));
    }

    #[test]
    fn display_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = ConfigError::IoError(io_err);
        assert!(format!("{err}").starts_with("failed to read project manifest:"));
    }
}
