//! Answer records produced per question

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One answered question: the question, the grounded answer, and a
/// formatted source-citation string
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRecord {
    /// The user's question
    pub question: String,
    /// The generated (or in-band failure) answer text
    pub answer: String,
    /// Numbered source citations, one line per retrieved passage
    pub sources: String,
    /// When the question was answered
    pub answered_at: DateTime<Utc>,
}

impl AnswerRecord {
    /// Create a new record stamped with the current time
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        sources: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            sources: sources.into(),
            answered_at: Utc::now(),
        }
    }
}
