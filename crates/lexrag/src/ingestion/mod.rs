//! Document ingestion: corpus loading, chunking, and index construction

mod chunker;
mod loader;
mod pipeline;

pub use chunker::TextChunker;
pub use loader::load_corpus;
pub use pipeline::IngestPipeline;
