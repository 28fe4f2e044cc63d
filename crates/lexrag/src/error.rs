//! Error types for the QA pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// QA pipeline errors
///
/// Ingestion-phase errors propagate to the caller: ingestion is an
/// explicit, operator-facing action and failures should halt with a clear
/// message. `Generation` is the one variant callers never see from the
/// answer path; the synthesizer converts it into an in-band answer string.
#[derive(Debug, Error)]
pub enum Error {
    /// The corpus directory does not exist
    #[error("corpus directory '{0}' does not exist")]
    CorpusNotFound(PathBuf),

    /// The corpus directory holds no ingestible documents
    #[error("no ingestible documents under '{0}'")]
    EmptyCorpus(PathBuf),

    /// A source file could not be parsed
    #[error("failed to parse '{filename}': {message}")]
    FileParse { filename: String, message: String },

    /// Remote embedding provider failure
    #[error("embedding provider error: {0}")]
    Embedding(String),

    /// Remote generation provider failure
    #[error("generation provider error: {0}")]
    Generation(String),

    /// Vector index error
    #[error(transparent)]
    Index(#[from] lexrag_index::IndexError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a file parse error
    pub fn file_parse(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileParse {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an embedding provider error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a generation provider error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }
}
