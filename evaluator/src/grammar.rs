//! Fixed, deterministic grammar rule set.
//!
//! This is intentionally a small closed set of checks, not a linguistic
//! grammar checker. Each violated rule records a human-readable issue and a
//! penalty on a perfect score of `1.0`; the result is clamped to `[0, 1]`.
//!
//! Strictness scales with the grade band: the earliest band (CP) is exempt
//! from the two orthographic rules (terminal punctuation and leading
//! capital), while the length rules apply to every band.

use crate::types::GradeBand;

/// Penalty for a missing terminal punctuation mark.
const MISSING_TERMINAL_PENALTY: f64 = 0.1;
/// Penalty for a missing leading capital letter.
const MISSING_CAPITAL_PENALTY: f64 = 0.1;
/// Penalty for an answer shorter than [`MIN_WORD_COUNT`] words.
const SHORT_ANSWER_PENALTY: f64 = 0.2;
/// Answers below this many words are flagged as very short.
const MIN_WORD_COUNT: usize = 3;

/// Result of the grammar check: a `[0, 1]` score and the issues found.
#[derive(Debug, Clone)]
pub struct GrammarReport {
    pub issues: Vec<String>,
    pub score: f64,
}

impl GrammarReport {
    /// A perfect report, used when the template does not request a grammar check.
    pub fn perfect() -> Self {
        Self {
            issues: Vec::new(),
            score: 1.0,
        }
    }
}

/// Checks `text` against the fixed rule set, scaled to the given grade band.
pub fn check_grammar(text: &str, grade: GradeBand) -> GrammarReport {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return GrammarReport {
            issues: vec!["La réponse est vide".to_string()],
            score: 0.0,
        };
    }

    let mut issues = Vec::new();
    let mut score: f64 = 1.0;

    if grade >= GradeBand::CE1 {
        if !trimmed.ends_with(['.', '!', '?']) {
            issues.push("La phrase devrait se terminer par un point".to_string());
            score -= MISSING_TERMINAL_PENALTY;
        }

        let starts_upper = trimmed.chars().next().is_some_and(|c| c.is_uppercase());
        if !starts_upper {
            issues.push("La phrase devrait commencer par une majuscule".to_string());
            score -= MISSING_CAPITAL_PENALTY;
        }
    }

    if trimmed.split_whitespace().count() < MIN_WORD_COUNT {
        issues.push("La réponse est très courte".to_string());
        score -= SHORT_ANSWER_PENALTY;
    }

    GrammarReport {
        issues,
        score: score.clamp(0.0, 1.0),
    }
}
