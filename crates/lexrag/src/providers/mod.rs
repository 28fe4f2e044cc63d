//! Provider abstractions for embeddings and answer generation
//!
//! Trait seams keep the pipeline testable against mock providers; the
//! one production implementation is [`OpenAiClient`], which serves both
//! traits over a single HTTP client.

pub mod embedding;
pub mod llm;
pub mod openai;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use openai::OpenAiClient;
