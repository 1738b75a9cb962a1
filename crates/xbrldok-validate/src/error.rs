//! Error types for instance validation

use std::time::Duration;

use thiserror::Error;
use xbrldok_core::ErrorKind;

/// Errors a validator can report instead of a verdict
///
/// A verdict with errors in it is still `Ok`; these variants mean no verdict
/// could be produced at all.
#[derive(Error, Debug)]
pub enum ValidateError {
    /// The validator cannot run here (engine not installed, empty chain)
    #[error("Validator unavailable: {0}")]
    Unavailable(String),

    /// The engine was started but could not be run to completion
    #[error("Validator '{command}' failed to run: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The engine exceeded its deadline and was killed
    #[error("Validator '{command}' timed out after {}s", .limit.as_secs())]
    Timeout { command: String, limit: Duration },

    /// The instance is not well-formed XML
    #[error("Malformed instance '{path}': {message}")]
    Malformed { path: String, message: String },

    /// The instance could not be read
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ValidateError {
    /// The pipeline error kind this error maps onto
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidateError::Unavailable(_) => ErrorKind::NotFound,
            ValidateError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                ErrorKind::NotFound
            }
            ValidateError::Spawn { .. } | ValidateError::Timeout { .. } | ValidateError::Io { .. } => {
                ErrorKind::Io
            }
            ValidateError::Malformed { .. } => ErrorKind::Format,
        }
    }

    /// Whether the next validator in a chain should be tried
    ///
    /// Only failures of the engine itself fall through. A malformed or
    /// unreadable instance would fail every validator the same way.
    pub fn is_fallback(&self) -> bool {
        matches!(
            self,
            ValidateError::Unavailable(_)
                | ValidateError::Spawn { .. }
                | ValidateError::Timeout { .. }
        )
    }
}

/// Result type for validation
pub type Result<T> = std::result::Result<T, ValidateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            ValidateError::Unavailable("arelleCmdLine".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            ValidateError::Malformed {
                path: "report.xbrl".into(),
                message: "unexpected end".into()
            }
            .kind(),
            ErrorKind::Format
        );
        let missing = ValidateError::Io {
            path: "report.xbrl".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(missing.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_only_engine_failures_fall_back() {
        let timeout = ValidateError::Timeout {
            command: "arelleCmdLine".into(),
            limit: Duration::from_secs(300),
        };
        assert!(timeout.is_fallback());
        assert_eq!(timeout.to_string(), "Validator 'arelleCmdLine' timed out after 300s");

        let malformed = ValidateError::Malformed {
            path: "report.xbrl".into(),
            message: "bad".into(),
        };
        assert!(!malformed.is_fallback());
    }
}
