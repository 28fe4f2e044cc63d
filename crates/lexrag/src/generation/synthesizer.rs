//! Grounded answer synthesis with in-band failure handling

use std::sync::Arc;

use crate::providers::LlmProvider;
use crate::types::{AnswerRecord, ScoredChunk};

use super::prompt::PromptBuilder;

/// Fixed reply for an empty or whitespace-only question
pub const EMPTY_QUESTION_REPLY: &str = "Please enter a question.";

/// Citation string when retrieval returned nothing
pub const NO_SOURCES: &str = "No source information available.";

/// Turns retrieved passages plus a question into an answer record
///
/// This boundary never propagates a remote-model error: a failed
/// generation becomes an answer string describing the failure, so the
/// session keeps running and the user always sees a response.
pub struct AnswerSynthesizer {
    llm: Arc<dyn LlmProvider>,
}

impl AnswerSynthesizer {
    /// Create a synthesizer over a generation provider
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Answer a question from the retrieved passages
    ///
    /// Empty questions short-circuit with a fixed prompt-the-user message
    /// and no model call.
    pub async fn answer(&self, question: &str, retrieved: &[ScoredChunk]) -> AnswerRecord {
        if question.trim().is_empty() {
            return AnswerRecord::new(question, EMPTY_QUESTION_REPLY, String::new());
        }

        let context = PromptBuilder::build_context(retrieved);
        let prompt = PromptBuilder::build_grounded_prompt(question, &context);

        let answer = match self.llm.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "answer generation failed");
                format!("An error occurred while generating the answer: {e}")
            }
        };

        AnswerRecord::new(question, answer, Self::format_sources(retrieved))
    }

    /// Format source citations: one numbered line per retrieved passage,
    /// showing the file base name and page number
    pub fn format_sources(retrieved: &[ScoredChunk]) -> String {
        if retrieved.is_empty() {
            return NO_SOURCES.to_string();
        }

        retrieved
            .iter()
            .enumerate()
            .map(|(i, chunk)| match chunk.page {
                Some(page) => format!("[{}] {} (page {})", i + 1, chunk.source_name(), page),
                None => format!("[{}] {}", i + 1, chunk.source_name()),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::error::{Error, Result};

    struct EchoLlm {
        calls: AtomicUsize,
    }

    impl EchoLlm {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for EchoLlm {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("echo: {}", prompt.len()))
        }

        fn model(&self) -> &str {
            "echo"
        }
    }

    struct FailingLlm;

    #[async_trait]
    impl LlmProvider for FailingLlm {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Err(Error::generation("HTTP 503: service unavailable"))
        }

        fn model(&self) -> &str {
            "failing"
        }
    }

    fn scored(text: &str, source: &str, page: Option<u32>) -> ScoredChunk {
        ScoredChunk {
            text: text.to_string(),
            source: PathBuf::from(source),
            page,
            chunk_index: 0,
            score: 0.8,
        }
    }

    #[tokio::test]
    async fn test_empty_question_short_circuits() {
        let llm = Arc::new(EchoLlm::new());
        let synthesizer = AnswerSynthesizer::new(llm.clone());

        for question in ["", "   ", "\n\t "] {
            let record = synthesizer
                .answer(question, &[scored("text", "/data/act1.pdf", Some(1))])
                .await;
            assert_eq!(record.answer, EMPTY_QUESTION_REPLY);
            assert!(record.sources.is_empty());
        }
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_answer_includes_formatted_sources() {
        let synthesizer = AnswerSynthesizer::new(Arc::new(EchoLlm::new()));
        let retrieved = vec![
            scored("Article 1.", "/data/act1.pdf", Some(3)),
            scored("Article 2.", "/data/act2.pdf", Some(1)),
        ];

        let record = synthesizer.answer("What is the purpose?", &retrieved).await;

        assert!(record.answer.starts_with("echo:"));
        assert_eq!(record.sources, "[1] act1.pdf (page 3)\n[2] act2.pdf (page 1)");
        assert_eq!(record.question, "What is the purpose?");
    }

    #[tokio::test]
    async fn test_generation_failure_becomes_in_band_answer() {
        let synthesizer = AnswerSynthesizer::new(Arc::new(FailingLlm));
        let retrieved = vec![scored("Article 1.", "/data/act1.pdf", Some(3))];

        let record = synthesizer.answer("What is the purpose?", &retrieved).await;

        assert!(record
            .answer
            .starts_with("An error occurred while generating the answer"));
        assert!(record.answer.contains("503"));
        // Sources still describe what was retrieved.
        assert_eq!(record.sources, "[1] act1.pdf (page 3)");
    }

    #[test]
    fn test_format_sources_uses_base_names_and_pages() {
        let retrieved = vec![
            scored("a", "/data/act1.pdf", Some(3)),
            scored("b", "/data/act2.pdf", Some(1)),
        ];
        assert_eq!(
            AnswerSynthesizer::format_sources(&retrieved),
            "[1] act1.pdf (page 3)\n[2] act2.pdf (page 1)"
        );
    }

    #[test]
    fn test_format_sources_without_page() {
        let retrieved = vec![scored("a", "/data/notes.txt", None)];
        assert_eq!(AnswerSynthesizer::format_sources(&retrieved), "[1] notes.txt");
    }

    #[test]
    fn test_format_sources_empty() {
        assert_eq!(AnswerSynthesizer::format_sources(&[]), NO_SOURCES);
    }
}
