//! Document, chunk, and answer types with source tracking

pub mod answer;
pub mod document;

pub use answer::AnswerRecord;
pub use document::{Chunk, Document, ScoredChunk};
