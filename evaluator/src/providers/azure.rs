//! Azure OpenAI text-generation adapter.
//!
//! Azure routes chat completions through a deployment-scoped URL and
//! authenticates with an `api-key` header instead of a bearer token.

use crate::error::EvaluatorError;
use crate::providers::TextGenerator;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const API_VERSION: &str = "2023-05-15";

pub struct AzureOpenAiGenerator {
    client: reqwest::Client,
    api_key: String,
    url: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
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
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl AzureOpenAiGenerator {
    pub fn new(api_key: String, endpoint: String, deployment: String) -> Self {
        let url = format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            endpoint.trim_end_matches('/'),
            deployment,
            API_VERSION
        );
        Self {
            client: reqwest::Client::new(),
            api_key,
            url,
        }
    }
}

#[async_trait]
impl TextGenerator for AzureOpenAiGenerator {
    async fn generate_text(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, EvaluatorError> {
        let response = self
            .client
            .post(&self.url)
            .header("api-key", &self.api_key)
            .json(&ChatRequest {
                messages: vec![ChatMessage {
                    role: "user",
                    content: prompt,
                }],
                max_tokens,
                temperature,
            })
            .send()
            .await
            .map_err(|e| EvaluatorError::Provider(format!("Azure OpenAI request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EvaluatorError::Provider(format!(
                "Azure OpenAI API error: {status} - {body}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| EvaluatorError::Provider(format!("Azure OpenAI response decode: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| EvaluatorError::Provider("Azure OpenAI returned no choices".to_string()))
    }
}
