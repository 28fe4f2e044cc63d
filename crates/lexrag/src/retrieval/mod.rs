//! Similarity-search retrieval over a built vector index

mod search;

pub use search::Retriever;
