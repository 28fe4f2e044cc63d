//! lexrag: retrieval-augmented question answering over statute PDFs
//!
//! This crate ingests a directory of PDF legal documents into a persisted
//! vector index, retrieves the passages most similar to a question, and
//! asks a generative model to compose an answer grounded in those
//! passages, with per-passage source citations.

pub mod config;
pub mod engine;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod session;
pub mod types;

pub use config::RagConfig;
pub use engine::QaEngine;
pub use error::{Error, Result};
pub use session::QaSession;
pub use types::{AnswerRecord, Chunk, Document, ScoredChunk};

/// Re-export the index crate for convenience
pub use lexrag_index;
