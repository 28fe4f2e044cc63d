//! Generative model provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Generates answer text from an assembled prompt
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Run one generation request and return the model's text
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Model identifier, for logging
    fn model(&self) -> &str;
}
