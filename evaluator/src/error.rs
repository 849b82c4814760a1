//! Evaluator Error Types
//!
//! This module defines the [`EvaluatorError`] enum, which covers every error that can
//! escape the evaluation engine. Provider transport failures inside the scoring and
//! feedback paths are deliberately *not* represented here once evaluation is underway:
//! they are absorbed at the semantic-matching and feedback boundaries and replaced by
//! documented neutral defaults, so an evaluation always completes with a well-formed
//! result. What remains are the conditions a caller must handle before an evaluation
//! can run at all.

use thiserror::Error;

/// Represents the recoverable, caller-facing error conditions of the engine.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    /// Transport or HTTP failure from a text-generation or embedding provider.
    ///
    /// Only surfaced from direct provider calls (e.g. constructing or probing an
    /// adapter); during an evaluation these are downgraded to neutral defaults.
    #[error("provider error: {0}")]
    Provider(String),

    /// The question or answer template does not belong to the submitted answer.
    /// Evaluation cannot proceed without a matching template.
    #[error("not found: {0}")]
    NotFound(String),

    /// A malformed input record, rejected before any provider call is made.
    #[error("validation failed: {0}")]
    Validation(String),
}
