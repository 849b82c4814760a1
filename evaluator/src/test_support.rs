//! Scripted provider doubles shared by the unit tests.

use crate::error::EvaluatorError;
use crate::providers::{Embedder, TextGenerator};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A text generator that replays a scripted sequence of responses.
///
/// Once the script is exhausted it either repeats a fixed response
/// ([`ScriptedGenerator::always`]) or fails every call
/// ([`ScriptedGenerator::failing`]).
pub(crate) struct ScriptedGenerator {
    responses: Mutex<VecDeque<Result<String, EvaluatorError>>>,
    repeated: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    pub(crate) fn new(responses: Vec<Result<String, EvaluatorError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            repeated: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Returns `text` for every call.
    pub(crate) fn always(text: &str) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            repeated: Some(text.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fails every call with a provider error.
    pub(crate) fn failing() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            repeated: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate_text(
        &self,
        _prompt: &str,
        _max_tokens: u32,
        _temperature: f32,
    ) -> Result<String, EvaluatorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(response) = self.responses.lock().unwrap().pop_front() {
            return response;
        }

        match &self.repeated {
            Some(text) => Ok(text.clone()),
            None => Err(EvaluatorError::Provider("scripted failure".to_string())),
        }
    }
}

/// An embedder whose cosine similarity is a fixed value.
pub(crate) struct FixedEmbedder {
    pub(crate) similarity: f64,
}

#[async_trait]
impl Embedder for FixedEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EvaluatorError> {
        Ok(vec![1.0])
    }

    async fn cosine_similarity(&self, _a: &str, _b: &str) -> Result<f64, EvaluatorError> {
        Ok(self.similarity)
    }
}

/// An embedder that fails every call.
pub(crate) struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EvaluatorError> {
        Err(EvaluatorError::Provider("scripted failure".to_string()))
    }
}
