//! Provider Contracts
//!
//! The engine depends on exactly two external capabilities: "generate text
//! from a prompt" ([`TextGenerator`]) and "embed text / compute cosine
//! similarity" ([`Embedder`]). Each vendor (OpenAI, Hugging Face Inference,
//! Azure OpenAI) supplies one implementation per capability; the adapter is
//! selected once at construction from configuration, never per call.
//!
//! Provider credentials and endpoints are read-only process-wide state, so
//! adapters are safe to share across arbitrarily many concurrent evaluations.

pub mod azure;
pub mod huggingface;
pub mod openai;

use crate::error::EvaluatorError;
use async_trait::async_trait;
use common::Config;
use std::sync::Arc;

/// Default token budget for a generation request.
pub const DEFAULT_MAX_TOKENS: u32 = 500;
/// Default sampling temperature for a generation request.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Capability: generate text from a prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates a completion for `prompt`.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluatorError::Provider`] on transport failure or a
    /// non-success HTTP status.
    async fn generate_text(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, EvaluatorError>;
}

/// Capability: embed text and compare embeddings.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Returns the embedding vector for `text`.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluatorError::Provider`] on transport failure or a
    /// non-success HTTP status.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EvaluatorError>;

    /// Cosine similarity between the embeddings of two texts, mapped from
    /// `[-1, 1]` to `[0, 1]`.
    async fn cosine_similarity(&self, a: &str, b: &str) -> Result<f64, EvaluatorError> {
        let va = self.embed(a).await?;
        let vb = self.embed(b).await?;
        Ok(normalized_cosine(&va, &vb))
    }
}

/// Cosine of two vectors mapped to `[0, 1]` via `(cos + 1) / 2`.
///
/// Degenerate inputs (zero vector, length mismatch) have no defined angle and
/// resolve to the neutral `0.5`.
pub(crate) fn normalized_cosine(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || a.len() != b.len() {
        return 0.5;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += f64::from(*x) * f64::from(*y);
        norm_a += f64::from(*x) * f64::from(*x);
        norm_b += f64::from(*y) * f64::from(*y);
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.5;
    }

    let cosine = (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0);
    (cosine + 1.0) / 2.0
}

/// Builds the configured text-generation adapter.
///
/// # Errors
///
/// Returns [`EvaluatorError::Validation`] for an unsupported provider name.
pub fn text_generator_from_config(config: &Config) -> Result<Arc<dyn TextGenerator>, EvaluatorError> {
    match config.llm_provider.as_str() {
        "openai" => Ok(Arc::new(openai::OpenAiGenerator::new(
            config.llm_api_key.clone(),
            config.llm_model_name.clone(),
            config.llm_api_endpoint.clone(),
        ))),
        "huggingface" => Ok(Arc::new(huggingface::HuggingFaceGenerator::new(
            config.llm_api_key.clone(),
            config.llm_model_name.clone(),
        ))),
        "azure" => {
            let endpoint = config.llm_api_endpoint.clone().ok_or_else(|| {
                EvaluatorError::Validation(
                    "LLM_API_ENDPOINT is required for the azure provider".to_string(),
                )
            })?;
            Ok(Arc::new(azure::AzureOpenAiGenerator::new(
                config.llm_api_key.clone(),
                endpoint,
                config.llm_deployment_name.clone(),
            )))
        }
        other => Err(EvaluatorError::Validation(format!(
            "unsupported LLM provider: {other}"
        ))),
    }
}

/// Builds the configured embedding adapter.
///
/// # Errors
///
/// Returns [`EvaluatorError::Validation`] for an unsupported provider name.
pub fn embedder_from_config(config: &Config) -> Result<Arc<dyn Embedder>, EvaluatorError> {
    match config.embedding_provider.as_str() {
        "openai" => Ok(Arc::new(openai::OpenAiEmbedder::new(
            config.embedding_api_key.clone(),
            config.embedding_model_name.clone(),
        ))),
        "huggingface" => Ok(Arc::new(huggingface::HuggingFaceEmbedder::new(
            config.embedding_api_key.clone(),
            config.embedding_model_name.clone(),
        ))),
        other => Err(EvaluatorError::Validation(format!(
            "unsupported embedding provider: {other}"
        ))),
    }
}
