//! Error types for cfgsync

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("The file to update does not exist: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Default resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Ignored sections must be a section, not a value: {0}")]
    NotASection(String),

    #[error("Invalid ignored section: {0}")]
    InvalidIgnoredSection(String),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Yaml(#[from] cfgsync_yaml::Error),
}

impl SyncError {
    /// Wrap an IO error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
