//! Hugging Face Inference API adapters.
//!
//! Text generation posts to the model's inference endpoint with the
//! `text-generation` parameter shape; embeddings use the same endpoint family
//! with `wait_for_model` so cold models spin up instead of erroring. Response
//! shapes vary by model (bare array vs wrapped object), so both are accepted.

use crate::error::EvaluatorError;
use crate::providers::{Embedder, TextGenerator};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

fn inference_endpoint(model: &str) -> String {
    format!("https://api-inference.huggingface.co/models/{model}")
}

pub struct HuggingFaceGenerator {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

#[derive(Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Serialize)]
struct GenerationParameters {
    max_new_tokens: u32,
    temperature: f32,
    return_full_text: bool,
    do_sample: bool,
}

#[derive(Deserialize)]
struct GeneratedText {
    generated_text: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GenerationResponse {
    Many(Vec<GeneratedText>),
    One(GeneratedText),
}

impl HuggingFaceGenerator {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            endpoint: inference_endpoint(&model),
        }
    }
}

#[async_trait]
impl TextGenerator for HuggingFaceGenerator {
    async fn generate_text(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, EvaluatorError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&GenerationRequest {
                inputs: prompt,
                parameters: GenerationParameters {
                    max_new_tokens: max_tokens,
                    temperature,
                    return_full_text: false,
                    do_sample: true,
                },
            })
            .send()
            .await
            .map_err(|e| EvaluatorError::Provider(format!("Hugging Face request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EvaluatorError::Provider(format!(
                "Hugging Face API error: {status} - {body}"
            )));
        }

        let parsed: GenerationResponse = response
            .json()
            .await
            .map_err(|e| EvaluatorError::Provider(format!("Hugging Face response decode: {e}")))?;

        let text = match parsed {
            GenerationResponse::Many(mut items) if !items.is_empty() => {
                items.remove(0).generated_text
            }
            GenerationResponse::One(item) => item.generated_text,
            GenerationResponse::Many(_) => {
                return Err(EvaluatorError::Provider(
                    "Hugging Face returned an empty generation list".to_string(),
                ));
            }
        };

        Ok(text.trim().to_string())
    }
}

pub struct HuggingFaceEmbedder {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    inputs: &'a str,
    options: EmbeddingOptions,
}

#[derive(Serialize)]
struct EmbeddingOptions {
    wait_for_model: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EmbeddingResponse {
    Vectors(Vec<Vec<f32>>),
    Wrapped { embeddings: Vec<f32> },
}

impl HuggingFaceEmbedder {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            endpoint: inference_endpoint(&model),
        }
    }
}

#[async_trait]
impl Embedder for HuggingFaceEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EvaluatorError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&EmbeddingRequest {
                inputs: text,
                options: EmbeddingOptions {
                    wait_for_model: true,
                },
            })
            .send()
            .await
            .map_err(|e| {
                EvaluatorError::Provider(format!("Hugging Face embedding request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EvaluatorError::Provider(format!(
                "Hugging Face embedding API error: {status} - {body}"
            )));
        }

        let parsed: EmbeddingResponse = response.json().await.map_err(|e| {
            EvaluatorError::Provider(format!("Hugging Face embedding decode: {e}"))
        })?;

        match parsed {
            EmbeddingResponse::Vectors(mut vectors) if !vectors.is_empty() => Ok(vectors.remove(0)),
            EmbeddingResponse::Wrapped { embeddings } => Ok(embeddings),
            EmbeddingResponse::Vectors(_) => Err(EvaluatorError::Provider(
                "Hugging Face returned no embedding".to_string(),
            )),
        }
    }
}
