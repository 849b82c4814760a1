//! OpenAI adapters for text generation and embeddings.
//!
//! Chat-style models (`gpt*`) use the messages payload; older completion
//! models fall back to the plain prompt payload. Both adapters hold a shared
//! [`reqwest::Client`] and their credentials, fixed at construction.

use crate::error::EvaluatorError;
use crate::providers::{Embedder, TextGenerator};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const DEFAULT_CHAT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const EMBEDDINGS_ENDPOINT: &str = "https://api.openai.com/v1/embeddings";

pub struct OpenAiGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    text: String,
}

impl OpenAiGenerator {
    pub fn new(api_key: String, model: String, endpoint: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_CHAT_ENDPOINT.to_string()),
        }
    }

    fn is_chat_model(&self) -> bool {
        self.model.to_lowercase().contains("gpt")
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate_text(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, EvaluatorError> {
        let request = self.client.post(&self.endpoint).bearer_auth(&self.api_key);

        let response = if self.is_chat_model() {
            request
                .json(&ChatRequest {
                    model: &self.model,
                    messages: vec![ChatMessage {
                        role: "user",
                        content: prompt,
                    }],
                    max_tokens,
                    temperature,
                })
                .send()
                .await
        } else {
            request
                .json(&CompletionRequest {
                    model: &self.model,
                    prompt,
                    max_tokens,
                    temperature,
                })
                .send()
                .await
        }
        .map_err(|e| EvaluatorError::Provider(format!("OpenAI request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EvaluatorError::Provider(format!(
                "OpenAI API error: {status} - {body}"
            )));
        }

        if self.is_chat_model() {
            let parsed: ChatResponse = response
                .json()
                .await
                .map_err(|e| EvaluatorError::Provider(format!("OpenAI response decode: {e}")))?;
            parsed
                .choices
                .into_iter()
                .next()
                .map(|c| c.message.content.trim().to_string())
                .ok_or_else(|| EvaluatorError::Provider("OpenAI returned no choices".to_string()))
        } else {
            let parsed: CompletionResponse = response
                .json()
                .await
                .map_err(|e| EvaluatorError::Provider(format!("OpenAI response decode: {e}")))?;
            parsed
                .choices
                .into_iter()
                .next()
                .map(|c| c.text.trim().to_string())
                .ok_or_else(|| EvaluatorError::Provider("OpenAI returned no choices".to_string()))
        }
    }
}

pub struct OpenAiEmbedder {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl OpenAiEmbedder {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        }
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EvaluatorError> {
        let response = self
            .client
            .post(EMBEDDINGS_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&EmbeddingRequest {
                model: &self.model,
                input: text,
            })
            .send()
            .await
            .map_err(|e| EvaluatorError::Provider(format!("OpenAI embedding request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EvaluatorError::Provider(format!(
                "OpenAI embedding API error: {status} - {body}"
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EvaluatorError::Provider(format!("OpenAI embedding decode: {e}")))?;

        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| EvaluatorError::Provider("OpenAI returned no embedding".to_string()))
    }
}
