//! Error types for index construction, search, and persistence

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for index operations
pub type Result<T> = std::result::Result<T, IndexError>;

/// Index errors
#[derive(Debug, Error)]
pub enum IndexError {
    /// Building an index requires at least one entry
    #[error("cannot build an index from zero entries")]
    EmptyIndex,

    /// Vector arity disagrees with the index
    #[error("vector dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// No persisted index at the given location
    #[error("no persisted index at '{0}'")]
    NotFound(PathBuf),

    /// The persisted form is unreadable or version-incompatible
    #[error("persisted index at '{path}' is corrupt: {message}")]
    Corrupt { path: PathBuf, message: String },

    /// The persisted index was built with a different embedding model
    #[error("index was built with embedding model '{found}', expected '{expected}'")]
    ModelMismatch { expected: String, found: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IndexError {
    /// Create a corruption error for a location
    pub fn corrupt(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Corrupt {
            path: path.into(),
            message: message.into(),
        }
    }
}
