//! Error types for document loading and dumping.

use thiserror::Error;

/// Result type alias for cfgsync-yaml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or dumping a document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// YAML syntax error reported by the scanner
    #[error("Parse error: {0}")]
    Parse(String),

    /// The text parsed, but not into something usable as a document
    #[error("Invalid YAML structure: {0}")]
    InvalidStructure(String),

    /// The emitter failed to serialize a value
    #[error("Emit error: {0}")]
    Emit(String),
}

impl From<yaml_rust2::ScanError> for Error {
    fn from(err: yaml_rust2::ScanError) -> Self {
        Error::Parse(err.to_string())
    }
}

impl From<yaml_rust2::EmitError> for Error {
    fn from(err: yaml_rust2::EmitError) -> Self {
        Error::Emit(format!("{:?}", err))
    }
}
