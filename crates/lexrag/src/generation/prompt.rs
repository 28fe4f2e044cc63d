//! Prompt templates for grounded answer generation

use crate::types::ScoredChunk;

/// Builds the grounding prompt from retrieved passages and the question
pub struct PromptBuilder;

impl PromptBuilder {
    /// Concatenate retrieved passages into a numbered context block
    pub fn build_context(results: &[ScoredChunk]) -> String {
        let mut context = String::new();

        for (i, result) in results.iter().enumerate() {
            let source_ref = match result.page {
                Some(page) => format!("{}, page {}", result.source_name(), page),
                None => result.source_name(),
            };
            context.push_str(&format!(
                "[{}] {}\n{}\n\n",
                i + 1,
                source_ref,
                result.text
            ));
        }

        context
    }

    /// Build the full grounded prompt
    ///
    /// The instruction block pins the model to the supplied passages:
    /// no outside knowledge, an explicit statement when the passages do
    /// not contain the answer, precise quotation of statutory text, and
    /// an answer in the language of the passages.
    pub fn build_grounded_prompt(question: &str, context: &str) -> String {
        format!(
            r#"You are an expert on the legislation contained in the reference passages below. Answer the user's question accurately and in detail.

Follow these rules:
1. Base your answer only on the content of the reference passages.
2. If the passages do not contain the answer, state clearly that the provided documents do not contain that information.
3. Be as specific and detailed as the passages allow.
4. Quote legal provisions and article numbers precisely.
5. Write the answer in the same language as the reference passages.

Reference passages:
{context}

Question: {question}

Answer:"#
        )
    }
}
