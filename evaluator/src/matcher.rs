//! # Semantic Matcher
//!
//! Fuses two independent similarity estimates into one presence/closeness
//! score: an embedding cosine similarity and a language-model judgment
//! elicited by prompting for a 0–1 rating. The model judgment carries the
//! larger weight because it is more context-aware than raw embeddings.
//!
//! A semantic-matching subsystem must never abort an evaluation outright:
//! transport failures and unparseable model output both degrade to the
//! neutral [`NEUTRAL_SIMILARITY`] ("unknown, assume partial credit").

use crate::error::EvaluatorError;
use crate::providers::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, Embedder, TextGenerator};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Weight of the embedding cosine estimate in the fused similarity.
pub const EMBEDDING_SIMILARITY_WEIGHT: f64 = 0.3;
/// Weight of the language-model judgment in the fused similarity.
pub const LLM_SIMILARITY_WEIGHT: f64 = 0.7;
/// Neutral prior substituted when a provider fails or returns no usable number.
pub const NEUTRAL_SIMILARITY: f64 = 0.5;

/// Computes semantic similarity and conceptual element presence.
pub struct SemanticMatcher {
    generator: Arc<dyn TextGenerator>,
    embedder: Arc<dyn Embedder>,
}

impl SemanticMatcher {
    pub fn new(generator: Arc<dyn TextGenerator>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            generator,
            embedder,
        }
    }

    /// Semantic similarity between two texts, in `[0, 1]`.
    ///
    /// Any provider failure degrades to [`NEUTRAL_SIMILARITY`] instead of
    /// propagating.
    pub async fn similarity(&self, text_a: &str, text_b: &str) -> f64 {
        match self.try_similarity(text_a, text_b).await {
            Ok(similarity) => similarity,
            Err(e) => {
                error!("similarity computation degraded to neutral: {e}");
                NEUTRAL_SIMILARITY
            }
        }
    }

    async fn try_similarity(&self, text_a: &str, text_b: &str) -> Result<f64, EvaluatorError> {
        let embedding_similarity = self.embedder.cosine_similarity(text_a, text_b).await?;
        let llm_similarity = self.llm_similarity(text_a, text_b).await?;

        let fused = embedding_similarity * EMBEDDING_SIMILARITY_WEIGHT
            + llm_similarity * LLM_SIMILARITY_WEIGHT;

        debug!(
            "semantic similarity: {fused} (embedding: {embedding_similarity}, llm: {llm_similarity})"
        );
        Ok(fused)
    }

    /// How strongly the named concept is present in `text`, in `[0, 1]`,
    /// independent of exact wording. Degrades to [`NEUTRAL_SIMILARITY`] on
    /// provider failure or unparseable output.
    pub async fn element_presence(&self, text: &str, element: &str) -> f64 {
        let prompt = format!(
            r#"Détermine si le concept ou l'idée suivant est présent dans le texte donné,
même s'il est exprimé avec des mots différents.

Concept à rechercher: "{element}"

Texte: "{text}"

Indique sur une échelle de 0 à 1 à quel point ce concept est présent dans le texte.
Réponds uniquement avec un nombre entre 0 et 1, sans explication."#
        );

        let response = match self
            .generator
            .generate_text(&prompt, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("element presence check degraded to neutral: {e}");
                return NEUTRAL_SIMILARITY;
            }
        };

        match parse_score(&response) {
            Some(score) => score.clamp(0.0, 1.0),
            None => {
                warn!("non-numeric model response for element presence: {response:?}");
                NEUTRAL_SIMILARITY
            }
        }
    }

    async fn llm_similarity(&self, text_a: &str, text_b: &str) -> Result<f64, EvaluatorError> {
        let prompt = format!(
            r#"Compare les deux textes suivants et évalue leur similarité sémantique
(c'est-à-dire la correspondance de sens, pas nécessairement des mots exacts).

Texte 1: "{text_a}"

Texte 2: "{text_b}"

Indique sur une échelle de 0 à 1 à quel point ces textes expriment la même idée ou information.
Réponds uniquement avec un nombre entre 0 et 1, sans explication."#
        );

        let response = self
            .generator
            .generate_text(&prompt, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE)
            .await?;

        Ok(match parse_score(&response) {
            Some(score) => score.clamp(0.0, 1.0),
            None => {
                warn!("non-numeric model response for similarity: {response:?}");
                NEUTRAL_SIMILARITY
            }
        })
    }
}

/// Extracts the first floating-point token of a model response.
///
/// Tokens are whitespace-separated; surrounding punctuation is ignored so
/// answers like `"0.85."` or `"Note: 0.85"` still yield a number.
fn parse_score(response: &str) -> Option<f64> {
    response.split_whitespace().find_map(|token| {
        let token = token.trim_matches(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'));
        // A sentence-final period survives the trim above ('.' is kept for
        // the decimal point), so strip it separately.
        token.trim_end_matches('.').parse::<f64>().ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FailingEmbedder, FixedEmbedder, ScriptedGenerator};

    fn matcher(generator: ScriptedGenerator, embedder: impl Embedder + 'static) -> SemanticMatcher {
        SemanticMatcher::new(Arc::new(generator), Arc::new(embedder))
    }

    #[test]
    fn parse_score_takes_first_float_token() {
        assert_eq!(parse_score("0.85"), Some(0.85));
        assert_eq!(parse_score("Note: 0.6 environ"), Some(0.6));
        assert_eq!(parse_score("0.85."), Some(0.85));
        assert_eq!(parse_score("La similarité est de 0.7."), Some(0.7));
        assert_eq!(parse_score("1..."), Some(1.0));
        assert_eq!(parse_score("aucun nombre ici"), None);
        assert_eq!(parse_score(""), None);
    }

    #[tokio::test]
    async fn similarity_fuses_embedding_and_model_estimates() {
        let m = matcher(
            ScriptedGenerator::always("0.9"),
            FixedEmbedder { similarity: 0.8 },
        );
        let s = m.similarity("la pluie", "il pleut").await;
        assert!((s - (0.3 * 0.8 + 0.7 * 0.9)).abs() < 1e-9);
    }

    #[tokio::test]
    async fn unparseable_model_judgment_substitutes_neutral() {
        let m = matcher(
            ScriptedGenerator::always("je ne sais pas"),
            FixedEmbedder { similarity: 1.0 },
        );
        let s = m.similarity("a", "b").await;
        assert!((s - (0.3 * 1.0 + 0.7 * 0.5)).abs() < 1e-9);
    }

    #[tokio::test]
    async fn embedder_failure_degrades_to_neutral() {
        let m = matcher(ScriptedGenerator::always("0.9"), FailingEmbedder);
        assert_eq!(m.similarity("a", "b").await, NEUTRAL_SIMILARITY);
    }

    #[tokio::test]
    async fn generator_failure_degrades_to_neutral() {
        let m = matcher(ScriptedGenerator::failing(), FixedEmbedder { similarity: 1.0 });
        assert_eq!(m.similarity("a", "b").await, NEUTRAL_SIMILARITY);
    }

    #[tokio::test]
    async fn element_presence_parses_and_clamps() {
        let m = matcher(
            ScriptedGenerator::new(vec![Ok("0.85".into()), Ok("1.7".into()), Ok("-0.3".into())]),
            FixedEmbedder { similarity: 0.0 },
        );
        assert_eq!(m.element_presence("texte", "concept").await, 0.85);
        assert_eq!(m.element_presence("texte", "concept").await, 1.0);
        assert_eq!(m.element_presence("texte", "concept").await, 0.0);
    }

    #[tokio::test]
    async fn element_presence_never_errors() {
        let failing = matcher(ScriptedGenerator::failing(), FixedEmbedder { similarity: 0.0 });
        assert_eq!(
            failing.element_presence("texte", "concept").await,
            NEUTRAL_SIMILARITY
        );

        let garbled = matcher(
            ScriptedGenerator::always("présent, je pense"),
            FixedEmbedder { similarity: 0.0 },
        );
        assert_eq!(
            garbled.element_presence("texte", "concept").await,
            NEUTRAL_SIMILARITY
        );
    }
}
