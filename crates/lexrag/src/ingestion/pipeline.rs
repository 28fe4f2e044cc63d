//! Ingestion pipeline orchestration

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use tokio::sync::Mutex;

use lexrag_index::{IndexEntry, VectorIndex};

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::ingestion::{load_corpus, TextChunker};
use crate::providers::EmbeddingProvider;
use crate::types::Chunk;

/// Single-flight locks keyed by index location; concurrent ingestion into
/// one location is serialized within the process.
static INGEST_LOCKS: Lazy<DashMap<PathBuf, Arc<Mutex<()>>>> = Lazy::new(DashMap::new);

fn ingest_lock(location: &Path) -> Arc<Mutex<()>> {
    INGEST_LOCKS
        .entry(location.to_path_buf())
        .or_insert_with(|| Arc::new(Mutex::new(())))
        .clone()
}

/// Orchestrates load → chunk → embed → build → persist for one corpus
///
/// Ingestion is idempotent over an unchanged corpus: when a persisted
/// index already exists at the target location and no rebuild is forced,
/// it is loaded as-is and no remote call is made. A failure mid-pipeline
/// discards all progress; the next invocation starts over.
pub struct IngestPipeline {
    corpus_dir: PathBuf,
    index_dir: PathBuf,
    chunker: TextChunker,
    embedder: Arc<dyn EmbeddingProvider>,
    metric: lexrag_index::DistanceMetric,
    batch_size: usize,
}

impl IngestPipeline {
    /// Create a pipeline from configuration and an embedding provider
    pub fn new(config: &RagConfig, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            corpus_dir: config.corpus.data_dir.clone(),
            index_dir: config.index.index_dir.clone(),
            chunker: TextChunker::new(config.chunking.chunk_size, config.chunking.chunk_overlap),
            embedder,
            metric: config.embedding.metric,
            batch_size: config.embedding.batch_size.max(1),
        }
    }

    /// Return a ready vector index, building it only when needed
    ///
    /// With `force_rebuild` set the existing index is ignored and the
    /// corpus is re-ingested from scratch.
    pub async fn ensure_index(&self, force_rebuild: bool) -> Result<VectorIndex> {
        let lock = ingest_lock(&self.index_dir);
        let _guard = lock.lock().await;

        if !force_rebuild && VectorIndex::exists(&self.index_dir) {
            tracing::info!(location = %self.index_dir.display(), "using existing vector index");
            let index = VectorIndex::load(&self.index_dir)?;
            index.ensure_model(self.embedder.model())?;
            return Ok(index);
        }

        self.build_index().await
    }

    async fn build_index(&self) -> Result<VectorIndex> {
        tracing::info!(corpus = %self.corpus_dir.display(), "loading documents");
        let documents = load_corpus(&self.corpus_dir)?;

        tracing::info!(documents = documents.len(), "splitting documents into chunks");
        let chunks: Vec<Chunk> = documents
            .iter()
            .flat_map(|doc| self.chunker.chunk_document(doc))
            .collect();
        if chunks.is_empty() {
            return Err(Error::EmptyCorpus(self.corpus_dir.clone()));
        }

        tracing::info!(
            chunks = chunks.len(),
            model = %self.embedder.model(),
            "embedding chunks"
        );
        let mut entries = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(self.batch_size) {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            let vectors = self.embedder.embed_batch(&texts).await?;
            if vectors.len() != batch.len() {
                return Err(Error::embedding(format!(
                    "provider returned {} vectors for {} chunks",
                    vectors.len(),
                    batch.len()
                )));
            }
            for (chunk, vector) in batch.iter().zip(vectors) {
                entries.push(IndexEntry {
                    vector,
                    text: chunk.text.clone(),
                    metadata: chunk.to_entry_metadata(),
                });
            }
        }

        let index = VectorIndex::build(self.embedder.model(), self.metric, entries)?;
        index.persist(&self.index_dir)?;
        tracing::info!(entries = index.len(), "ingestion complete");
        Ok(index)
    }
}
