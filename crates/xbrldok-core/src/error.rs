//! Error types for the fact pipeline
//!
//! Every error carries the key that identifies what went wrong: a fact id,
//! a namespace prefix, a transform name, or a file path.

use std::fmt;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

/// Coarse classification of pipeline errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Malformed package, XML, JSON or TOML
    Format,
    /// Missing required file, archive part or registry
    NotFound,
    /// Unknown fact id, namespace prefix or transform name
    Lookup,
    /// A value does not match the pattern its transform or type requires
    Validation,
    /// Dangling or inconsistent configuration
    Config,
    /// Reading or writing failed for another reason
    Io,
}

/// What a lookup was searching for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupTarget {
    /// A fact id missing from the fact registry
    FactId,
    /// A concept prefix with no namespace binding
    Prefix,
    /// A transform name missing from the transformation registry
    Transform,
}

impl fmt::Display for LookupTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LookupTarget::FactId => "factId",
            LookupTarget::Prefix => "namespace prefix",
            LookupTarget::Transform => "transformation",
        };
        f.write_str(label)
    }
}

/// Errors that can occur while extracting, normalizing or emitting facts
#[derive(Error, Debug)]
pub enum Error {
    /// Content could not be parsed
    #[error("Malformed content in '{path}': {message}")]
    Format { path: String, message: String },

    /// Required file, part or registry is absent
    #[error("Required file not found: {0}")]
    NotFound(String),

    /// Unknown identifier
    #[error("Unknown {target}: {key}")]
    Lookup { target: LookupTarget, key: String },

    /// Value rejected by a transform or by its type's lexical grammar
    #[error("{key}: invalid value '{value}' (expected {expected})")]
    Validation {
        key: String,
        value: String,
        expected: String,
    },

    /// Configuration is inconsistent
    #[error("Configuration error for '{key}': {message}")]
    Config { key: String, message: String },

    /// Other I/O failure
    #[error("IO error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Build a format error for the given path
    pub fn format(path: impl Into<String>, message: impl fmt::Display) -> Self {
        Error::Format {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Build a lookup error
    pub fn lookup(target: LookupTarget, key: impl Into<String>) -> Self {
        Error::Lookup {
            target,
            key: key.into(),
        }
    }

    /// Build a configuration error
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Wrap an I/O error, mapping "not found" onto [`Error::NotFound`]
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound(path.display().to_string())
        } else {
            Error::Io {
                path: path.display().to_string(),
                source,
            }
        }
    }

    /// The taxonomy bucket of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Format { .. } => ErrorKind::Format,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Lookup { .. } => ErrorKind::Lookup,
            Error::Validation { .. } => ErrorKind::Validation,
            Error::Config { .. } => ErrorKind::Config,
            Error::Io { .. } => ErrorKind::Io,
        }
    }

    /// The identifying key carried by this error
    pub fn key(&self) -> &str {
        match self {
            Error::Format { path, .. } | Error::Io { path, .. } => path,
            Error::NotFound(path) => path,
            Error::Lookup { key, .. }
            | Error::Validation { key, .. }
            | Error::Config { key, .. } => key,
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;
