//! Answer/element normalization used by the literal key-element check.
//!
//! Matching is done on a canonical form of both the answer text and the
//! expected element: lowercased, punctuation replaced by spaces, accents
//! folded to their ASCII base letter, whitespace collapsed. This keeps the
//! cheap containment test insensitive to casing, accents and punctuation so
//! the provider only has to be consulted for genuine paraphrases.

use regex::Regex;
use std::sync::OnceLock;

static PUNCTUATION: OnceLock<Regex> = OnceLock::new();

/// Returns the canonical form of `text` used for literal containment tests.
pub fn normalize_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let lowered = text.to_lowercase();

    // `\w` is Unicode-aware, so accented letters survive this pass and are
    // folded below, mirroring the punctuation-then-accents order of the
    // canonical form.
    let punctuation = PUNCTUATION.get_or_init(|| Regex::new(r"[^\w\s]").expect("valid regex"));
    let stripped = punctuation.replace_all(&lowered, " ");

    let folded: String = stripped.chars().filter_map(fold_accent).collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Folds French accented letters to their base ASCII letter. Characters with
/// no ASCII base (including ligatures such as `œ`) are dropped.
fn fold_accent(c: char) -> Option<char> {
    match c {
        'à' | 'â' | 'ä' => Some('a'),
        'é' | 'è' | 'ê' | 'ë' => Some('e'),
        'î' | 'ï' => Some('i'),
        'ô' | 'ö' => Some('o'),
        'ù' | 'û' | 'ü' => Some('u'),
        'ç' => Some('c'),
        c if c.is_ascii() => Some(c),
        _ => None,
    }
}
