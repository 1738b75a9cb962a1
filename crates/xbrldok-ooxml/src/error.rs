//! Error types for DOCX operations

use thiserror::Error;
use xbrldok_core::ErrorKind;

/// Errors that can occur while reading or building a DOCX package
#[derive(Error, Debug)]
pub enum OoxmlError {
    /// Error reading or writing the ZIP archive
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Error reading or writing files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing XML content
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Required part not found in archive
    #[error("Required part not found in package: {0}")]
    MissingFile(String),

    /// Invalid document structure
    #[error("Invalid document structure: {0}")]
    InvalidStructure(String),
}

impl OoxmlError {
    /// The pipeline error kind this error maps onto
    ///
    /// A missing file on disk is `NotFound`; anything wrong with the package
    /// itself, including a missing part, is `Format`.
    pub fn kind(&self) -> ErrorKind {
        match self {
            OoxmlError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => ErrorKind::NotFound,
            OoxmlError::Io(_) => ErrorKind::Io,
            OoxmlError::Archive(_)
            | OoxmlError::Xml(_)
            | OoxmlError::MissingFile(_)
            | OoxmlError::InvalidStructure(_) => ErrorKind::Format,
        }
    }

    /// Convert into a pipeline error keyed by the document path
    pub fn into_pipeline_error(self, path: &str) -> xbrldok_core::Error {
        match self.kind() {
            ErrorKind::NotFound => xbrldok_core::Error::NotFound(path.to_string()),
            ErrorKind::Io => match self {
                OoxmlError::Io(source) => xbrldok_core::Error::Io {
                    path: path.to_string(),
                    source,
                },
                other => xbrldok_core::Error::format(path, other),
            },
            _ => xbrldok_core::Error::format(path, self),
        }
    }
}

/// Result type for DOCX operations
pub type Result<T> = std::result::Result<T, OoxmlError>;
