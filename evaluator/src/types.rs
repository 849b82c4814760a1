//! # Types Module
//!
//! Core data structures shared across the evaluation engine: the input records
//! supplied by the caller (question, answer template, student answer), the
//! ephemeral [`AnalysisResult`] produced per evaluation, and the [`Feedback`]
//! record assembled from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

/// Default weight of key-element coverage in the weighted score.
pub const DEFAULT_KEY_ELEMENTS_WEIGHT: f64 = 0.7;
/// Default weight of the grammar score in the weighted score.
pub const DEFAULT_GRAMMAR_WEIGHT: f64 = 0.3;

/// School-level bucket used to scale feedback vocabulary and grammar-check
/// strictness. Ordered from earliest to latest band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GradeBand {
    CP,
    CE1,
    CE2,
    CM1,
    CM2,
}

impl std::fmt::Display for GradeBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            GradeBand::CP => "CP",
            GradeBand::CE1 => "CE1",
            GradeBand::CE2 => "CE2",
            GradeBand::CM1 => "CM1",
            GradeBand::CM2 => "CM2",
        };
        f.write_str(label)
    }
}

/// Discrete outcome of an evaluated answer.
///
/// Ordered by answer quality so that callers can compare statuses directly:
/// `Incorrect < PartiallyCorrect < Acceptable < Correct < Excellent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerStatus {
    Incorrect,
    PartiallyCorrect,
    Acceptable,
    Correct,
    Excellent,
}

/// Tone/strategy category used to phrase feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackType {
    Encouragement,
    Nuanced,
    Corrective,
    Explanatory,
}

/// An open (free-text) question. Immutable once scoring begins.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OpenQuestion {
    #[validate(length(min = 1, message = "question id cannot be empty"))]
    pub id: String,
    #[validate(length(min = 1, message = "question text cannot be empty"))]
    pub text: String,
    /// Free-form category (comprehension, grammar, vocabulary, ...).
    pub question_type: String,
    #[validate(range(min = 1, max = 5, message = "difficulty level must be between 1 and 5"))]
    pub difficulty_level: u8,
    pub grade: GradeBand,
    #[validate(range(min = 1.0, message = "maxScore must be at least 1"))]
    pub max_score: f64,
}

/// Relative weights of the scoring criteria. Need not sum to 1, but typically do.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub key_elements: f64,
    pub grammar: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            key_elements: DEFAULT_KEY_ELEMENTS_WEIGHT,
            grammar: DEFAULT_GRAMMAR_WEIGHT,
        }
    }
}

/// Optional per-template overrides of the scoring policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringRubric {
    /// Overrides the default `0.7 / 0.3` criteria weights when present.
    pub weights: Option<ScoreWeights>,
    /// Multiplies the weighted fraction before it is scaled by `max_score`.
    /// The raw score is still capped at `max_score` afterwards.
    pub score_multiplier: Option<f64>,
}

/// Teacher-defined template an answer is graded against.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnswerTemplate {
    #[validate(length(min = 1, message = "template questionId cannot be empty"))]
    pub question_id: String,
    #[validate(length(min = 1, message = "model answer cannot be empty"))]
    pub model_answer: String,
    /// Concepts expected to appear (verbatim or paraphrased) in a correct answer.
    pub key_elements: Vec<String>,
    /// Per-element alternate phrasings that count as a literal match.
    #[serde(default)]
    pub acceptable_synonyms: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub scoring_rubric: ScoringRubric,
    #[validate(range(min = 0.0, message = "minimumScore cannot be negative"))]
    pub minimum_score: f64,
    pub requires_grammar_check: bool,
}

/// A student's submission for one question. Score and status are written back
/// by the engine once the answer has been analyzed.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StudentAnswer {
    #[validate(length(min = 1, message = "answer id cannot be empty"))]
    pub id: String,
    #[validate(length(min = 1, message = "studentId cannot be empty"))]
    pub student_id: String,
    #[validate(length(min = 1, message = "answer questionId cannot be empty"))]
    pub question_id: String,
    pub answer_text: String,
    pub attempt_number: u32,
    pub score_obtained: f64,
    /// `None` until the answer has been evaluated.
    pub status: Option<AnswerStatus>,
}

/// The learner a feedback message is addressed to.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Student {
    #[validate(length(min = 1, message = "firstName cannot be empty"))]
    pub first_name: String,
    pub last_name: String,
    pub grade: GradeBand,
}

/// Sub-scores feeding the weighted total, kept for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisDetails {
    pub key_elements_score: f64,
    pub grammar_score: f64,
    /// Similarity to the model answer; reporting only, never part of the score.
    pub semantic_similarity: f64,
}

/// Outcome of analyzing one answer against its template.
///
/// Created and consumed within a single evaluation call; the engine does not
/// persist it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub answer_id: String,
    pub question_id: String,
    pub raw_score: f64,
    pub max_score: f64,
    pub percentage_score: f64,
    pub status: AnswerStatus,
    pub key_elements_found: Vec<String>,
    pub key_elements_missing: Vec<String>,
    pub grammar_issues: Vec<String>,
    pub details: AnalysisDetails,
}

/// Structured echo of an analysis, embedded in the feedback record so the
/// feedback can be rendered without the (ephemeral) analysis result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectionDetails {
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
    pub status: AnswerStatus,
    pub key_elements_found: Vec<String>,
    pub key_elements_missing: Vec<String>,
    pub grammar_issues: Vec<String>,
}

impl From<&AnalysisResult> for CorrectionDetails {
    fn from(analysis: &AnalysisResult) -> Self {
        Self {
            score: analysis.raw_score,
            max_score: analysis.max_score,
            percentage: analysis.percentage_score,
            status: analysis.status,
            key_elements_found: analysis.key_elements_found.clone(),
            key_elements_missing: analysis.key_elements_missing.clone(),
            grammar_issues: analysis.grammar_issues.clone(),
        }
    }
}

/// Pedagogical feedback generated for one evaluated answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub answer_id: String,
    /// Natural-language feedback text; never empty, even under total provider
    /// unavailability.
    pub content: String,
    pub correction_details: CorrectionDetails,
    /// At most 3 entries.
    pub suggested_improvements: Vec<String>,
    /// At most 3 entries.
    pub positive_points: Vec<String>,
    pub feedback_type: FeedbackType,
    /// Set later by the learner, outside the engine.
    pub was_helpful: Option<bool>,
    pub generated_at: DateTime<Utc>,
}
