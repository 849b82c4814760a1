//! Feedback generation: register selection, grade-adapted prompt
//! construction, content generation with deterministic fallback, and
//! structured extraction of suggestions and positive points.

pub mod extraction;
pub mod generator;
pub mod prompts;

pub use generator::{FeedbackGenerator, register_for};
