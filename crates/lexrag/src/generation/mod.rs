//! Answer synthesis: prompt assembly and grounded generation

mod prompt;
mod synthesizer;

pub use prompt::PromptBuilder;
pub use synthesizer::{AnswerSynthesizer, EMPTY_QUESTION_REPLY, NO_SOURCES};
