//! Query-time retrieval: embed the question, search the index

use std::sync::Arc;

use lexrag_index::VectorIndex;

use crate::error::Result;
use crate::providers::EmbeddingProvider;
use crate::types::ScoredChunk;

/// Retrieves the passages most similar to a query
///
/// Stateless beyond a reference to one built (or loaded) index and a
/// fixed result count. Results are recomputed per query, never cached.
pub struct Retriever {
    index: Arc<VectorIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
    top_k: usize,
}

impl Retriever {
    /// Create a retriever over a ready index
    pub fn new(index: Arc<VectorIndex>, embedder: Arc<dyn EmbeddingProvider>, top_k: usize) -> Self {
        Self {
            index,
            embedder,
            top_k,
        }
    }

    /// Return the ranked passages for a query, nearest first
    ///
    /// Always `min(top_k, index size)` results for a non-empty index.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<ScoredChunk>> {
        let vector = self.embedder.embed_query(query).await?;
        let hits = self.index.search(&vector, self.top_k)?;

        tracing::debug!(query_len = query.len(), results = hits.len(), "retrieved passages");
        Ok(hits.into_iter().map(ScoredChunk::from_hit).collect())
    }

    /// Configured result count
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Number of entries in the underlying index
    pub fn index_size(&self) -> usize {
        self.index.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    use async_trait::async_trait;

    use lexrag_index::{DistanceMetric, IndexEntry};

    use crate::error::Error;

    /// Embeds any query to a fixed vector
    struct FixedEmbedder(Vec<f32>);

    #[async_trait]
    impl EmbeddingProvider for FixedEmbedder {
        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| self.0.clone()).collect())
        }

        fn dimensions(&self) -> usize {
            self.0.len()
        }

        fn model(&self) -> &str {
            "fixed"
        }
    }

    /// Always fails, for the error path
    struct FailingEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FailingEmbedder {
        async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Err(Error::embedding("connection refused"))
        }

        fn dimensions(&self) -> usize {
            2
        }

        fn model(&self) -> &str {
            "failing"
        }
    }

    fn entry(vector: Vec<f32>, text: &str, source: &str, page: u32) -> IndexEntry {
        let mut metadata = HashMap::new();
        metadata.insert("source".to_string(), serde_json::json!(source));
        metadata.insert("page".to_string(), serde_json::json!(page));
        IndexEntry {
            vector,
            text: text.to_string(),
            metadata,
        }
    }

    /// Two documents, five chunks, known embeddings; the query vector
    /// (1, 0) is closest to chunk 3.
    fn five_chunk_index() -> Arc<VectorIndex> {
        let entries = vec![
            entry(vec![0.0, 1.0], "chunk 0", "/data/act1.pdf", 1),
            entry(vec![0.3, 0.7], "chunk 1", "/data/act1.pdf", 2),
            entry(vec![0.5, 0.5], "chunk 2", "/data/act1.pdf", 3),
            entry(vec![1.0, 0.01], "chunk 3", "/data/act2.pdf", 1),
            entry(vec![0.6, 0.4], "chunk 4", "/data/act2.pdf", 2),
        ];
        Arc::new(VectorIndex::build("fixed", DistanceMetric::Cosine, entries).unwrap())
    }

    #[tokio::test]
    async fn test_retrieve_top_k_nearest_first() {
        let retriever = Retriever::new(
            five_chunk_index(),
            Arc::new(FixedEmbedder(vec![1.0, 0.0])),
            4,
        );

        let results = retriever.retrieve("which chunk?").await.unwrap();

        assert_eq!(results.len(), 4);
        assert_eq!(results[0].text, "chunk 3");
        assert_eq!(results[0].page, Some(1));
        assert_eq!(results[0].source_name(), "act2.pdf");
    }

    #[tokio::test]
    async fn test_retrieve_caps_at_index_size() {
        let retriever = Retriever::new(
            five_chunk_index(),
            Arc::new(FixedEmbedder(vec![1.0, 0.0])),
            10,
        );
        let results = retriever.retrieve("q").await.unwrap();
        assert_eq!(results.len(), 5);
    }

    #[tokio::test]
    async fn test_embedding_failure_propagates() {
        let retriever = Retriever::new(five_chunk_index(), Arc::new(FailingEmbedder), 4);
        let err = retriever.retrieve("q").await.unwrap_err();
        assert!(matches!(err, Error::Embedding(_)));
    }
}
