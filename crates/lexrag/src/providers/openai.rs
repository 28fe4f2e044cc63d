//! OpenAI-backed embedding and generation client
//!
//! One reqwest client, authenticated with the caller-supplied API key,
//! serves both the `/embeddings` and `/chat/completions` endpoints. No
//! retries here: failures carry the HTTP status and provider message so
//! callers can tell transport trouble from credential or rate-limit
//! rejections and wrap their own policy around it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::{EmbeddingConfig, LlmConfig};
use crate::error::{Error, Result};

use super::embedding::EmbeddingProvider;
use super::llm::LlmProvider;

/// Client for a remote OpenAI-compatible API
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    embedding: EmbeddingConfig,
    llm: LlmConfig,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl OpenAiClient {
    /// Create a new client
    ///
    /// The timeout from `llm.timeout_secs` applies to every request on
    /// this client, embedding and generation alike.
    pub fn new(api_key: impl Into<String>, embedding: &EmbeddingConfig, llm: &LlmConfig) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Error::Config("API key must not be empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(llm.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            embedding: embedding.clone(),
            llm: llm.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.llm.base_url.trim_end_matches('/'), path)
    }

    /// POST a JSON body and decode a JSON response, mapping failures
    /// through `fail` so embedding and generation keep distinct errors
    async fn post_json<Req, Resp>(
        &self,
        url: &str,
        body: &Req,
        fail: fn(String) -> Error,
    ) -> Result<Resp>
    where
        Req: Serialize + Sync,
        Resp: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| fail(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(fail(format!("HTTP {status}: {detail}")));
        }

        response
            .json::<Resp>()
            .await
            .map_err(|e| fail(format!("malformed response: {e}")))
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiClient {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!(
            batch_size = texts.len(),
            model = %self.embedding.model,
            "embedding batch"
        );

        let request = EmbeddingRequest {
            model: &self.embedding.model,
            input: texts,
        };
        let response: EmbeddingResponse = self
            .post_json(&self.endpoint("embeddings"), &request, Error::Embedding)
            .await?;

        if response.data.len() != texts.len() {
            return Err(Error::embedding(format!(
                "provider returned {} vectors for {} inputs",
                response.data.len(),
                texts.len()
            )));
        }

        Ok(response.data.into_iter().map(|d| d.embedding).collect())
    }

    fn dimensions(&self) -> usize {
        self.embedding.dimensions
    }

    fn model(&self) -> &str {
        &self.embedding.model
    }
}

#[async_trait]
impl LlmProvider for OpenAiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        tracing::debug!(model = %self.llm.model, prompt_len = prompt.len(), "generating answer");

        let request = ChatRequest {
            model: &self.llm.model,
            temperature: self.llm.temperature,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };
        let response: ChatResponse = self
            .post_json(&self.endpoint("chat/completions"), &request, Error::Generation)
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::generation("provider returned no choices"))
    }

    fn model(&self) -> &str {
        &self.llm.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{bearer_token, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OpenAiClient {
        let embedding = EmbeddingConfig {
            model: "text-embedding-3-small".to_string(),
            dimensions: 3,
            ..EmbeddingConfig::default()
        };
        let llm = LlmConfig {
            base_url: server.uri(),
            ..LlmConfig::default()
        };
        OpenAiClient::new("sk-test", &embedding, &llm).unwrap()
    }

    #[test]
    fn test_rejects_empty_api_key() {
        let result = OpenAiClient::new("", &EmbeddingConfig::default(), &LlmConfig::default());
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_embed_batch_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .and(bearer_token("sk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "text-embedding-3-small",
                "input": ["alpha", "beta"],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [
                    { "embedding": [0.1, 0.2, 0.3] },
                    { "embedding": [0.4, 0.5, 0.6] },
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let vectors = client
            .embed_batch(&["alpha".to_string(), "beta".to_string()])
            .await
            .unwrap();

        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0], vec![0.1, 0.2, 0.3]);
        assert_eq!(vectors[1], vec![0.4, 0.5, 0.6]);
    }

    #[tokio::test]
    async fn test_embed_batch_empty_input_makes_no_request() {
        let server = MockServer::start().await;
        let client = client_for(&server);
        let vectors = client.embed_batch(&[]).await.unwrap();
        assert!(vectors.is_empty());
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_embed_error_surfaces_status_and_provider_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": { "message": "Incorrect API key provided" }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.embed_batch(&["alpha".to_string()]).await.unwrap_err();

        match err {
            Error::Embedding(message) => {
                assert!(message.contains("401"));
                assert!(message.contains("Incorrect API key"));
            }
            other => panic!("expected embedding error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_embed_malformed_response_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.embed_batch(&["alpha".to_string()]).await.unwrap_err();
        assert!(matches!(err, Error::Embedding(_)));
    }

    #[tokio::test]
    async fn test_embed_count_mismatch_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [ { "embedding": [0.1, 0.2, 0.3] } ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .embed_batch(&["alpha".to_string(), "beta".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Embedding(_)));
    }

    #[tokio::test]
    async fn test_generate_success_uses_zero_temperature() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({ "temperature": 0.0 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [
                    { "message": { "role": "assistant", "content": "Article 5 says so." } }
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let answer = client.generate("What does Article 5 say?").await.unwrap();
        assert_eq!(answer, "Article 5 says so.");
    }

    #[tokio::test]
    async fn test_generate_error_is_a_generation_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": { "message": "Rate limit reached" }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.generate("question").await.unwrap_err();
        match err {
            Error::Generation(message) => {
                assert!(message.contains("429"));
                assert!(message.contains("Rate limit"));
            }
            other => panic!("expected generation error, got {other:?}"),
        }
    }
}
