//! Embedding provider trait

use async_trait::async_trait;

use crate::error::{Error, Result};

/// Converts text into fixed-dimension embedding vectors
///
/// Every call is a fresh remote computation; nothing is cached here.
/// Chunks are therefore embedded exactly once, at ingestion time, and
/// only queries are embedded afterwards.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of texts, returning one vector per input, in order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single query string
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| Error::embedding("provider returned no vector for the query"))
    }

    /// Embedding dimensions
    fn dimensions(&self) -> usize;

    /// Model identifier, recorded in the persisted index
    fn model(&self) -> &str;
}
