//! The question-answering boundary exposed to the surrounding application

use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::generation::AnswerSynthesizer;
use crate::ingestion::IngestPipeline;
use crate::providers::{EmbeddingProvider, LlmProvider, OpenAiClient};
use crate::retrieval::Retriever;
use crate::types::AnswerRecord;

/// End-to-end question answering over an ingested corpus
///
/// The single operation the front-end depends on is
/// [`QaEngine::answer_question`]; the front-end owns credential
/// acquisition and the session transcript, and never touches the index or
/// the embedding client directly.
pub struct QaEngine {
    retriever: Retriever,
    synthesizer: AnswerSynthesizer,
}

impl QaEngine {
    /// Assemble an engine from already-built parts
    pub fn new(retriever: Retriever, synthesizer: AnswerSynthesizer) -> Self {
        Self {
            retriever,
            synthesizer,
        }
    }

    /// Initialize the engine from configuration and an API key
    ///
    /// Runs ingestion (or loads the persisted index when the corpus was
    /// already ingested) and wires the retriever and synthesizer to one
    /// shared remote client. Ingestion failures propagate: this is the
    /// operator-facing startup path.
    pub async fn initialize(
        config: &RagConfig,
        api_key: &str,
        force_rebuild: bool,
    ) -> Result<Self> {
        let client = Arc::new(OpenAiClient::new(api_key, &config.embedding, &config.llm)?);
        let embedder: Arc<dyn EmbeddingProvider> = client.clone();
        let llm: Arc<dyn LlmProvider> = client;

        let pipeline = IngestPipeline::new(config, embedder.clone());
        let index = Arc::new(pipeline.ensure_index(force_rebuild).await?);

        let retriever = Retriever::new(index, embedder, config.retrieval.top_k);
        let synthesizer = AnswerSynthesizer::new(llm);
        Ok(Self::new(retriever, synthesizer))
    }

    /// Answer a question against the ingested corpus
    ///
    /// Empty questions short-circuit before any retrieval or model call.
    /// Query-time provider failures are folded into the returned record's
    /// answer text; this method never fails, so one bad query cannot take
    /// down an otherwise-healthy session.
    pub async fn answer_question(&self, question: &str) -> AnswerRecord {
        if question.trim().is_empty() {
            return self.synthesizer.answer(question, &[]).await;
        }

        let retrieved = match self.retriever.retrieve(question).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(error = %e, "retrieval failed");
                return AnswerRecord::new(
                    question,
                    format!("An error occurred while searching the documents: {e}"),
                    String::new(),
                );
            }
        };

        self.synthesizer.answer(question, &retrieved).await
    }

    /// Number of passages in the underlying index
    pub fn index_size(&self) -> usize {
        self.retriever.index_size()
    }

    /// Configured retrieval depth
    pub fn top_k(&self) -> usize {
        self.retriever.top_k()
    }
}
