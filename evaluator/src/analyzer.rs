//! # Answer Analyzer
//!
//! Scores a submitted answer against its template: key-element coverage,
//! grammar, the weighted total, the outcome status, and (for reporting only)
//! semantic similarity to the model answer.
//!
//! The analyzer is deterministic given deterministic provider responses and
//! holds no state across calls; it performs no retries and no persistence.

use crate::error::EvaluatorError;
use crate::grammar::{self, GrammarReport};
use crate::matcher::SemanticMatcher;
use crate::types::{
    AnalysisDetails, AnalysisResult, AnswerTemplate, OpenQuestion, ScoreWeights, StudentAnswer,
};
use crate::utilities::text_normalization::normalize_text;
use futures::future::join_all;
use tracing::info;
use validator::Validate;

/// An element whose conceptual-presence score reaches this threshold counts
/// as found even without a literal match.
pub const ELEMENT_PRESENCE_THRESHOLD: f64 = 0.8;

struct KeyElementsOutcome {
    found: Vec<String>,
    missing: Vec<String>,
    score: f64,
}

/// Analyzes student answers against their question and answer template.
pub struct AnswerAnalyzer {
    matcher: SemanticMatcher,
}

impl AnswerAnalyzer {
    pub fn new(matcher: SemanticMatcher) -> Self {
        Self { matcher }
    }

    /// Produces an [`AnalysisResult`] for one answer.
    ///
    /// # Errors
    ///
    /// - [`EvaluatorError::Validation`] for malformed input records, rejected
    ///   before any provider call.
    /// - [`EvaluatorError::NotFound`] when the question/template pair does not
    ///   belong to the answer.
    ///
    /// Provider failures during matching never surface here; they degrade to
    /// neutral defaults inside the [`SemanticMatcher`].
    pub async fn analyze(
        &self,
        answer: &StudentAnswer,
        question: &OpenQuestion,
        template: &AnswerTemplate,
    ) -> Result<AnalysisResult, EvaluatorError> {
        validate_inputs(answer, question, template)?;

        info!("analyzing answer {} for question {}", answer.id, question.id);

        // Element checks and the model-answer similarity are independent of
        // each other; only the weighted score has to wait for its inputs.
        let (key_elements, semantic_similarity) = tokio::join!(
            self.check_key_elements(&answer.answer_text, template),
            self.matcher
                .similarity(&answer.answer_text, &template.model_answer),
        );

        let grammar_report = if template.requires_grammar_check {
            grammar::check_grammar(&answer.answer_text, question.grade)
        } else {
            GrammarReport::perfect()
        };

        let weights = template.scoring_rubric.weights.unwrap_or_default();
        let mut weighted_fraction = weighted_fraction(key_elements.score, grammar_report.score, weights);
        if let Some(multiplier) = template.scoring_rubric.score_multiplier {
            weighted_fraction *= multiplier;
        }

        // The fraction is scaled by max_score and only then capped, so a
        // multiplier > 1 can saturate at max_score.
        let raw_score = (weighted_fraction * question.max_score).min(question.max_score);
        let percentage_score = raw_score / question.max_score * 100.0;

        let status = determine_status(raw_score, template.minimum_score, question.max_score);

        info!(
            "analysis complete for answer {}: {raw_score}/{} ({status:?})",
            answer.id, question.max_score
        );

        Ok(AnalysisResult {
            answer_id: answer.id.clone(),
            question_id: question.id.clone(),
            raw_score,
            max_score: question.max_score,
            percentage_score,
            status,
            key_elements_found: key_elements.found,
            key_elements_missing: key_elements.missing,
            grammar_issues: grammar_report.issues,
            details: AnalysisDetails {
                key_elements_score: key_elements.score,
                grammar_score: grammar_report.score,
                semantic_similarity,
            },
        })
    }

    /// Checks every expected element against the answer. The literal
    /// containment test (element, then its synonyms) short-circuits the
    /// provider call; elements have no data dependency on one another and are
    /// checked concurrently.
    async fn check_key_elements(
        &self,
        answer_text: &str,
        template: &AnswerTemplate,
    ) -> KeyElementsOutcome {
        if template.key_elements.is_empty() {
            return KeyElementsOutcome {
                found: Vec::new(),
                missing: Vec::new(),
                score: 1.0,
            };
        }

        let normalized_answer = normalize_text(answer_text);

        let checks = template.key_elements.iter().map(|element| {
            let normalized_answer = normalized_answer.as_str();
            async move {
                if normalized_answer.contains(&normalize_text(element)) {
                    return (element, true);
                }

                let synonyms = template.acceptable_synonyms.get(element);
                let literal_synonym = synonyms.is_some_and(|alternates| {
                    alternates
                        .iter()
                        .any(|s| normalized_answer.contains(&normalize_text(s)))
                });
                if literal_synonym {
                    return (element, true);
                }

                let presence = self.matcher.element_presence(answer_text, element).await;
                (element, presence >= ELEMENT_PRESENCE_THRESHOLD)
            }
        });

        let mut found = Vec::new();
        let mut missing = Vec::new();
        for (element, present) in join_all(checks).await {
            if present {
                found.push(element.clone());
            } else {
                missing.push(element.clone());
            }
        }

        let score = found.len() as f64 / template.key_elements.len() as f64;
        KeyElementsOutcome {
            found,
            missing,
            score,
        }
    }
}

fn validate_inputs(
    answer: &StudentAnswer,
    question: &OpenQuestion,
    template: &AnswerTemplate,
) -> Result<(), EvaluatorError> {
    answer
        .validate()
        .map_err(|e| EvaluatorError::Validation(common::format_validation_errors(&e)))?;
    question
        .validate()
        .map_err(|e| EvaluatorError::Validation(common::format_validation_errors(&e)))?;
    template
        .validate()
        .map_err(|e| EvaluatorError::Validation(common::format_validation_errors(&e)))?;

    if answer.question_id != question.id {
        return Err(EvaluatorError::NotFound(format!(
            "question {} does not match answer {}",
            question.id, answer.id
        )));
    }
    if template.question_id != question.id {
        return Err(EvaluatorError::NotFound(format!(
            "no answer template for question {}",
            question.id
        )));
    }

    Ok(())
}

fn weighted_fraction(key_elements_score: f64, grammar_score: f64, weights: ScoreWeights) -> f64 {
    key_elements_score * weights.key_elements + grammar_score * weights.grammar
}

/// Maps a raw score onto the discrete outcome status.
///
/// Thresholds relative to `max_score` apply above `minimum_score`; below it,
/// answers close to the minimum (>= 60% of it) still count as partially
/// correct.
fn determine_status(
    raw_score: f64,
    minimum_score: f64,
    max_score: f64,
) -> crate::types::AnswerStatus {
    use crate::types::AnswerStatus;

    if raw_score >= minimum_score {
        if raw_score >= max_score * 0.9 {
            AnswerStatus::Excellent
        } else if raw_score >= max_score * 0.75 {
            AnswerStatus::Correct
        } else {
            AnswerStatus::Acceptable
        }
    } else if raw_score >= minimum_score * 0.6 {
        AnswerStatus::PartiallyCorrect
    } else {
        AnswerStatus::Incorrect
    }
}
