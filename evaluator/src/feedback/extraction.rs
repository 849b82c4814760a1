//! Parser for the two-section list format the extraction prompt elicits.
//!
//! Free-text model output is brittle to parse, so the scanning lives behind a
//! dedicated parser type with tests seeded from literal responses, including
//! malformed ones. Parsing never fails: anything that does not match the
//! expected shape is ignored, and empty sections are later replaced by
//! defaults synthesized from the analysis evidence.

/// Header line opening the suggestions section.
pub const SUGGESTIONS_HEADER: &str = "SUGGESTIONS:";
/// Header line opening the positive-points section.
pub const POSITIVES_HEADER: &str = "POINTS POSITIFS:";

/// Suggestions and positive points recovered from a model response.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractedLists {
    pub suggestions: Vec<String>,
    pub positives: Vec<String>,
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    None,
    Suggestions,
    Positives,
}

/// Scans a response line by line, switching the active section on header
/// lines and collecting `"- "`-prefixed items into the active section.
pub struct SectionListParser;

impl SectionListParser {
    pub fn parse(&self, response: &str) -> ExtractedLists {
        let mut lists = ExtractedLists::default();
        let mut section = Section::None;

        for line in response.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if line == SUGGESTIONS_HEADER {
                section = Section::Suggestions;
            } else if line == POSITIVES_HEADER {
                section = Section::Positives;
            } else if let Some(item) = line.strip_prefix("- ") {
                let item = item.trim();
                if item.is_empty() {
                    continue;
                }
                match section {
                    Section::Suggestions => lists.suggestions.push(item.to_string()),
                    Section::Positives => lists.positives.push(item.to_string()),
                    Section::None => {}
                }
            }
        }

        lists
    }
}

/// Default suggestions when extraction yields none: name up to two missing
/// elements, or a generic prompt to elaborate.
pub fn default_suggestions(missing: &[String]) -> Vec<String> {
    if missing.is_empty() {
        vec!["Développer ta réponse davantage".to_string()]
    } else {
        let named: Vec<_> = missing.iter().take(2).cloned().collect();
        vec![format!(
            "Ajouter les éléments manquants: {}",
            named.join(", ")
        )]
    }
}

/// Default positive points when extraction yields none: name up to two found
/// elements, or acknowledge the effort.
pub fn default_positives(found: &[String]) -> Vec<String> {
    if found.is_empty() {
        vec!["Tu as fait l'effort de répondre à la question".to_string()]
    } else {
        let named: Vec<_> = found.iter().take(2).cloned().collect();
        vec![format!("Tu as bien mentionné: {}", named.join(", "))]
    }
}

/// Fixed suggestions used when the extraction provider call fails outright.
pub fn fallback_suggestions() -> Vec<String> {
    vec![
        "Relire attentivement la question".to_string(),
        "Ajouter plus de détails dans ta réponse".to_string(),
    ]
}

/// Fixed positive points used when the extraction provider call fails outright.
pub fn fallback_positives() -> Vec<String> {
    vec!["Tu as fait l'effort de répondre à la question".to_string()]
}
