//! CLI-specific error types with exit codes.
//!
//! Wraps library errors and maps each failure class to an exit code.

use aircon::Error as LibError;
use std::fmt;

/// CLI-specific error type with exit code mapping.
#[derive(Debug)]
pub enum CliError {
    /// Library error (wrapped).
    Library(LibError),

    /// Invalid command-line arguments.
    InvalidArguments(String),

    /// I/O error.
    Io(std::io::Error),

    /// Settings could not be loaded or are invalid.
    Settings(String),

    /// Diagnostics were already printed; carries their count.
    Diagnostics(usize),
}

impl CliError {
    /// Get the appropriate exit code for this error.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: Schema diagnostics
    /// - 4: Invalid arguments
    /// - 5: I/O error
    /// - 6: Other library error
    /// - 7: Settings error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Library(LibError::Compile(_)) | CliError::Diagnostics(_) => 1,
            CliError::Library(_) => 6,
            CliError::InvalidArguments(_) => 4,
            CliError::Io(_) => 5,
            CliError::Settings(_) => 7,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Library(e) => write!(f, "{e}"),
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
            CliError::Settings(msg) => write!(f, "Settings error: {msg}"),
            CliError::Diagnostics(count) => write!(f, "schema check failed with {count} error(s)"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Library(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LibError> for CliError {
    fn from(e: LibError) -> Self {
        match e {
            LibError::Io(io) => CliError::Io(io),
            LibError::Settings { .. } => CliError::Settings(e.to_string()),
            other => CliError::Library(other),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<csv::Error> for CliError {
    fn from(e: csv::Error) -> Self {
        CliError::Io(std::io::Error::other(e))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Io(std::io::Error::other(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aircon::{Diagnostic, DiagnosticKind, Diagnostics};

    #[test]
    fn test_exit_codes() {
        let diagnostics = Diagnostics::from(vec![Diagnostic::new(
            DiagnosticKind::MissingDefault,
            ["URL"],
            "features[0].configs[0]",
            "no default",
        )]);
        assert_eq!(CliError::from(LibError::Compile(diagnostics)).exit_code(), 1);
        assert_eq!(CliError::Diagnostics(3).exit_code(), 1);
        assert_eq!(CliError::InvalidArguments("x".into()).exit_code(), 4);
        assert_eq!(
            CliError::from(LibError::Io(std::io::Error::other("disk"))).exit_code(),
            5
        );
        assert_eq!(
            CliError::from(LibError::NotFound {
                resource: "config".into()
            })
            .exit_code(),
            6
        );
        assert_eq!(
            CliError::from(LibError::Settings {
                field: "runtime_path".into(),
                message: "bad".into()
            })
            .exit_code(),
            7
        );
    }
}
