//! # Feedback Generator
//!
//! Turns an [`AnalysisResult`] into a [`Feedback`] record: picks the register
//! for the outcome status, asks the text provider for grade-adapted feedback,
//! then runs a second extraction pass to pull structured suggestions and
//! positive points out of the generated text.
//!
//! Every provider failure degrades to a deterministic fallback; this module
//! never returns a provider error once the inputs have validated.

use crate::error::EvaluatorError;
use crate::feedback::extraction::{
    self, ExtractedLists, SectionListParser,
};
use crate::feedback::prompts::{self, PromptContext};
use crate::providers::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, TextGenerator};
use crate::types::{
    AnalysisResult, AnswerStatus, AnswerTemplate, CorrectionDetails, Feedback, FeedbackType,
    OpenQuestion, Student, StudentAnswer,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

/// Upper bound on suggestions and positive points kept per feedback.
pub const MAX_LIST_ITEMS: usize = 3;

/// Maps an outcome status onto its feedback register. Statuses that omit the
/// model answer (the student already got there) share the encouragement
/// register.
pub fn register_for(status: AnswerStatus) -> FeedbackType {
    match status {
        AnswerStatus::Excellent | AnswerStatus::Correct => FeedbackType::Encouragement,
        AnswerStatus::Acceptable => FeedbackType::Nuanced,
        AnswerStatus::PartiallyCorrect => FeedbackType::Corrective,
        AnswerStatus::Incorrect => FeedbackType::Explanatory,
    }
}

/// Generates pedagogical feedback from analysis evidence.
pub struct FeedbackGenerator {
    generator: Arc<dyn TextGenerator>,
}

impl FeedbackGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Produces a [`Feedback`] for one analyzed answer.
    ///
    /// # Errors
    ///
    /// [`EvaluatorError::Validation`] when the student record is malformed.
    /// Provider failures do not error: content falls back to a fixed
    /// encouragement message and the lists to fixed suggestions.
    pub async fn generate(
        &self,
        analysis: &AnalysisResult,
        student: &Student,
        answer: &StudentAnswer,
        question: &OpenQuestion,
        template: &AnswerTemplate,
    ) -> Result<Feedback, EvaluatorError> {
        student
            .validate()
            .map_err(|e| EvaluatorError::Validation(common::format_validation_errors(&e)))?;

        let feedback_type = register_for(analysis.status);
        info!(
            "generating {feedback_type:?} feedback for answer {} ({:?})",
            analysis.answer_id, analysis.status
        );

        let ctx = PromptContext {
            question_text: &question.text,
            answer_text: &answer.answer_text,
            model_answer: &template.model_answer,
            key_elements_found: &analysis.key_elements_found,
            key_elements_missing: &analysis.key_elements_missing,
            grammar_issues: &analysis.grammar_issues,
            score: analysis.raw_score,
            max_score: analysis.max_score,
            percentage: analysis.percentage_score,
            grade: student.grade,
        };

        let content = self.generate_content(feedback_type, &ctx).await;
        let (mut suggestions, mut positives) = self.extract_lists(&content, analysis).await;
        suggestions.truncate(MAX_LIST_ITEMS);
        positives.truncate(MAX_LIST_ITEMS);

        Ok(Feedback {
            answer_id: analysis.answer_id.clone(),
            content,
            correction_details: CorrectionDetails::from(analysis),
            suggested_improvements: suggestions,
            positive_points: positives,
            feedback_type,
            was_helpful: None,
            generated_at: Utc::now(),
        })
    }

    async fn generate_content(&self, feedback_type: FeedbackType, ctx: &PromptContext<'_>) -> String {
        let prompt = prompts::content_prompt(feedback_type, ctx);
        match self
            .generator
            .generate_text(&prompt, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE)
            .await
        {
            Ok(content) if !content.trim().is_empty() => content.trim().to_string(),
            Ok(_) => {
                warn!("feedback generation returned an empty response, using fallback");
                fallback_content(ctx.score, ctx.max_score)
            }
            Err(e) => {
                warn!("feedback generation failed, using fallback: {e}");
                fallback_content(ctx.score, ctx.max_score)
            }
        }
    }

    /// Second pass over the generated feedback. A failed provider call yields
    /// the fixed fallback lists; a successful call with an empty section
    /// yields defaults synthesized from the analysis evidence.
    async fn extract_lists(
        &self,
        content: &str,
        analysis: &AnalysisResult,
    ) -> (Vec<String>, Vec<String>) {
        let prompt = prompts::extraction_prompt(content);
        let lists = match self
            .generator
            .generate_text(&prompt, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE)
            .await
        {
            Ok(response) => SectionListParser.parse(&response),
            Err(e) => {
                warn!("feedback extraction failed, using fallback lists: {e}");
                return (
                    extraction::fallback_suggestions(),
                    extraction::fallback_positives(),
                );
            }
        };

        let ExtractedLists {
            mut suggestions,
            mut positives,
        } = lists;
        if suggestions.is_empty() {
            suggestions = extraction::default_suggestions(&analysis.key_elements_missing);
        }
        if positives.is_empty() {
            positives = extraction::default_positives(&analysis.key_elements_found);
        }
        (suggestions, positives)
    }
}

fn fallback_content(score: f64, max_score: f64) -> String {
    format!(
        "Bravo pour ton effort ! Tu as obtenu {score}/{max_score} points. Continue à t'améliorer !"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedGenerator;
    use crate::types::{AnalysisDetails, GradeBand, ScoringRubric};
    use std::collections::BTreeMap;

    fn analysis(status: AnswerStatus) -> AnalysisResult {
        AnalysisResult {
            answer_id: "a1".into(),
            question_id: "q1".into(),
            raw_score: 7.0,
            max_score: 10.0,
            percentage_score: 70.0,
            status,
            key_elements_found: vec!["eau".into()],
            key_elements_missing: vec!["nuage".into(), "évaporation".into()],
            grammar_issues: vec![],
            details: AnalysisDetails {
                key_elements_score: 0.5,
                grammar_score: 1.0,
                semantic_similarity: 0.6,
            },
        }
    }

    fn student() -> Student {
        Student {
            first_name: "Lina".into(),
            last_name: "Martin".into(),
            grade: GradeBand::CE2,
        }
    }

    fn question() -> OpenQuestion {
        OpenQuestion {
            id: "q1".into(),
            text: "D'où vient la pluie ?".into(),
            question_type: "comprehension".into(),
            difficulty_level: 2,
            grade: GradeBand::CE2,
            max_score: 10.0,
        }
    }

    fn answer() -> StudentAnswer {
        StudentAnswer {
            id: "a1".into(),
            student_id: "s1".into(),
            question_id: "q1".into(),
            answer_text: "Il y a de l'eau qui tombe.".into(),
            attempt_number: 1,
            score_obtained: 0.0,
            status: None,
        }
    }

    fn template() -> AnswerTemplate {
        AnswerTemplate {
            question_id: "q1".into(),
            model_answer: "La pluie vient de l'eau des nuages.".into(),
            key_elements: vec!["eau".into(), "nuage".into()],
            acceptable_synonyms: BTreeMap::new(),
            scoring_rubric: ScoringRubric::default(),
            minimum_score: 5.0,
            requires_grammar_check: true,
        }
    }

    #[test]
    fn register_covers_every_status() {
        assert_eq!(
            register_for(AnswerStatus::Excellent),
            FeedbackType::Encouragement
        );
        assert_eq!(
            register_for(AnswerStatus::Correct),
            FeedbackType::Encouragement
        );
        assert_eq!(register_for(AnswerStatus::Acceptable), FeedbackType::Nuanced);
        assert_eq!(
            register_for(AnswerStatus::PartiallyCorrect),
            FeedbackType::Corrective
        );
        assert_eq!(
            register_for(AnswerStatus::Incorrect),
            FeedbackType::Explanatory
        );
    }

    #[tokio::test]
    async fn happy_path_uses_generated_content_and_extracted_lists() {
        let generator = Arc::new(ScriptedGenerator::new(vec![
            Ok("Très bonne réponse, Lina ! Tu as bien identifié l'eau.".into()),
            Ok("\
SUGGESTIONS:
- parler des nuages
- terminer par un point

POINTS POSITIFS:
- l'eau est mentionnée
"
            .into()),
        ]));
        let feedback = FeedbackGenerator::new(generator)
            .generate(
                &analysis(AnswerStatus::Acceptable),
                &student(),
                &answer(),
                &question(),
                &template(),
            )
            .await
            .unwrap();

        assert_eq!(feedback.feedback_type, FeedbackType::Nuanced);
        assert!(feedback.content.contains("Très bonne réponse"));
        assert_eq!(
            feedback.suggested_improvements,
            vec!["parler des nuages", "terminer par un point"]
        );
        assert_eq!(feedback.positive_points, vec!["l'eau est mentionnée"]);
        assert_eq!(feedback.correction_details.score, 7.0);
        assert_eq!(feedback.was_helpful, None);
    }

    #[tokio::test]
    async fn total_provider_failure_still_yields_complete_feedback() {
        let feedback = FeedbackGenerator::new(Arc::new(ScriptedGenerator::failing()))
            .generate(
                &analysis(AnswerStatus::Incorrect),
                &student(),
                &answer(),
                &question(),
                &template(),
            )
            .await
            .unwrap();

        assert_eq!(feedback.feedback_type, FeedbackType::Explanatory);
        assert_eq!(
            feedback.content,
            "Bravo pour ton effort ! Tu as obtenu 7/10 points. Continue à t'améliorer !"
        );
        assert_eq!(
            feedback.suggested_improvements,
            vec![
                "Relire attentivement la question",
                "Ajouter plus de détails dans ta réponse"
            ]
        );
        assert_eq!(
            feedback.positive_points,
            vec!["Tu as fait l'effort de répondre à la question"]
        );
    }

    #[tokio::test]
    async fn extraction_failure_after_successful_generation_keeps_the_content() {
        let generator = Arc::new(ScriptedGenerator::new(vec![Ok(
            "Bonne tentative, continue !".into(),
        )]));
        let feedback = FeedbackGenerator::new(generator)
            .generate(
                &analysis(AnswerStatus::PartiallyCorrect),
                &student(),
                &answer(),
                &question(),
                &template(),
            )
            .await
            .unwrap();

        assert_eq!(feedback.content, "Bonne tentative, continue !");
        assert_eq!(
            feedback.suggested_improvements,
            vec![
                "Relire attentivement la question",
                "Ajouter plus de détails dans ta réponse"
            ]
        );
    }

    #[tokio::test]
    async fn empty_extracted_sections_fall_back_to_evidence_defaults() {
        let generator = Arc::new(ScriptedGenerator::new(vec![
            Ok("Tu progresses bien.".into()),
            Ok("Je n'ai rien trouvé à extraire.".into()),
        ]));
        let feedback = FeedbackGenerator::new(generator)
            .generate(
                &analysis(AnswerStatus::Acceptable),
                &student(),
                &answer(),
                &question(),
                &template(),
            )
            .await
            .unwrap();

        assert_eq!(
            feedback.suggested_improvements,
            vec!["Ajouter les éléments manquants: nuage, évaporation"]
        );
        assert_eq!(feedback.positive_points, vec!["Tu as bien mentionné: eau"]);
    }

    #[tokio::test]
    async fn lists_are_capped_at_three_items() {
        let generator = Arc::new(ScriptedGenerator::new(vec![
            Ok("Feedback détaillé.".into()),
            Ok("\
SUGGESTIONS:
- un
- deux
- trois
- quatre
POINTS POSITIFS:
- a
- b
- c
- d
"
            .into()),
        ]));
        let feedback = FeedbackGenerator::new(generator)
            .generate(
                &analysis(AnswerStatus::Acceptable),
                &student(),
                &answer(),
                &question(),
                &template(),
            )
            .await
            .unwrap();

        assert_eq!(feedback.suggested_improvements, vec!["un", "deux", "trois"]);
        assert_eq!(feedback.positive_points, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn empty_generated_content_uses_the_fallback_message() {
        let generator = Arc::new(ScriptedGenerator::new(vec![
            Ok("   ".into()),
            Ok("SUGGESTIONS:\n- relire\nPOINTS POSITIFS:\n- effort".into()),
        ]));
        let feedback = FeedbackGenerator::new(generator)
            .generate(
                &analysis(AnswerStatus::Correct),
                &student(),
                &answer(),
                &question(),
                &template(),
            )
            .await
            .unwrap();

        assert!(feedback.content.starts_with("Bravo pour ton effort !"));
        assert_eq!(feedback.suggested_improvements, vec!["relire"]);
    }

    #[tokio::test]
    async fn malformed_student_is_rejected_before_any_provider_call() {
        let mut s = student();
        s.first_name = String::new();

        let generator = Arc::new(ScriptedGenerator::always("réponse"));
        let err = FeedbackGenerator::new(generator.clone())
            .generate(
                &analysis(AnswerStatus::Correct),
                &s,
                &answer(),
                &question(),
                &template(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, EvaluatorError::Validation(_)));
        assert_eq!(generator.call_count(), 0);
    }
}
