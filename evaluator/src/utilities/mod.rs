//! Text helpers shared across the analysis pipeline.

pub mod text_normalization;
