//! # Evaluator
//!
//! Automated evaluation of short free-text answers: key-element coverage,
//! deterministic grammar checks, semantic similarity, a weighted score with a
//! discrete outcome status, and grade-adapted pedagogical feedback.
//!
//! The engine talks to two external capabilities, text generation and text
//! embedding, behind the [`providers`] traits; everything else is
//! deterministic. [`EvaluationJob`] is the entry point: construct one from
//! explicit providers or from configuration, then call
//! [`EvaluationJob::evaluate`] per answer.
//!
//! ```no_run
//! use evaluator::EvaluationJob;
//!
//! # async fn run(mut answer: evaluator::types::StudentAnswer,
//! #              student: evaluator::types::Student,
//! #              question: evaluator::types::OpenQuestion,
//! #              template: evaluator::types::AnswerTemplate)
//! #              -> Result<(), evaluator::error::EvaluatorError> {
//! let job = EvaluationJob::from_config(common::Config::init(".env"))?;
//! let evaluation = job.evaluate(&mut answer, &student, &question, &template).await?;
//! println!("{}: {}", evaluation.analysis.raw_score, evaluation.feedback.content);
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod error;
pub mod feedback;
pub mod grammar;
pub mod matcher;
pub mod providers;
pub mod types;
pub mod utilities;

#[cfg(test)]
mod test_support;

use crate::analyzer::AnswerAnalyzer;
use crate::error::EvaluatorError;
use crate::feedback::FeedbackGenerator;
use crate::matcher::SemanticMatcher;
use crate::providers::{Embedder, TextGenerator};
use crate::types::{
    AnalysisResult, AnswerTemplate, Feedback, OpenQuestion, Student, StudentAnswer,
};
use common::Config;
use std::sync::Arc;
use tracing::info;

/// Everything produced by one evaluation: the scoring evidence and the
/// feedback assembled from it.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub analysis: AnalysisResult,
    pub feedback: Feedback,
}

/// Owns the analysis and feedback pipeline for a fixed pair of providers.
///
/// A job is stateless across calls and cheap to share; one job can serve
/// arbitrarily many concurrent evaluations.
pub struct EvaluationJob {
    generator: Arc<dyn TextGenerator>,
    embedder: Arc<dyn Embedder>,
    analyzer: AnswerAnalyzer,
    feedback: FeedbackGenerator,
}

impl EvaluationJob {
    pub fn new(generator: Arc<dyn TextGenerator>, embedder: Arc<dyn Embedder>) -> Self {
        let matcher = SemanticMatcher::new(generator.clone(), embedder.clone());
        Self {
            analyzer: AnswerAnalyzer::new(matcher),
            feedback: FeedbackGenerator::new(generator.clone()),
            generator,
            embedder,
        }
    }

    /// Rebuilds the pipeline around a different text generator.
    pub fn with_generator(self, generator: Arc<dyn TextGenerator>) -> Self {
        Self::new(generator, self.embedder)
    }

    /// Rebuilds the pipeline around a different embedder.
    pub fn with_embedder(self, embedder: Arc<dyn Embedder>) -> Self {
        Self::new(self.generator, embedder)
    }

    /// Builds a job with the vendor adapters named in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluatorError::Validation`] for an unsupported provider name
    /// or a missing azure endpoint.
    pub fn from_config(config: &Config) -> Result<Self, EvaluatorError> {
        let generator = providers::text_generator_from_config(config)?;
        let embedder = providers::embedder_from_config(config)?;
        Ok(Self::new(generator, embedder))
    }

    /// Evaluates one answer end to end: analyze, write the score and status
    /// back onto the answer, then generate feedback.
    ///
    /// # Errors
    ///
    /// - [`EvaluatorError::Validation`] for malformed input records.
    /// - [`EvaluatorError::NotFound`] when the question/template pair does not
    ///   belong to the answer.
    ///
    /// Provider failures never error; they degrade to neutral similarity and
    /// fallback feedback. The answer is only mutated after a successful
    /// analysis.
    pub async fn evaluate(
        &self,
        answer: &mut StudentAnswer,
        student: &Student,
        question: &OpenQuestion,
        template: &AnswerTemplate,
    ) -> Result<Evaluation, EvaluatorError> {
        let analysis = self.analyzer.analyze(answer, question, template).await?;

        answer.score_obtained = analysis.raw_score;
        answer.status = Some(analysis.status);

        let feedback = self
            .feedback
            .generate(&analysis, student, answer, question, template)
            .await?;

        info!(
            "evaluated answer {} (attempt {}): {}/{} ({:?})",
            answer.id, answer.attempt_number, analysis.raw_score, analysis.max_score, analysis.status
        );

        Ok(Evaluation { analysis, feedback })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FixedEmbedder, ScriptedGenerator};
    use crate::types::{AnswerStatus, FeedbackType, GradeBand, ScoringRubric};
    use std::collections::BTreeMap;

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

    fn answer(text: &str) -> StudentAnswer {
        StudentAnswer {
            id: "a1".into(),
            student_id: "s1".into(),
            question_id: "q1".into(),
            answer_text: text.into(),
            attempt_number: 1,
            score_obtained: 0.0,
            status: None,
        }
    }

    fn student() -> Student {
        Student {
            first_name: "Lina".into(),
            last_name: "Martin".into(),
            grade: GradeBand::CE2,
        }
    }

    #[tokio::test]
    async fn evaluate_writes_score_and_status_back() {
        // Both key elements appear literally, grammar is clean: full marks.
        let job = EvaluationJob::new(
            Arc::new(ScriptedGenerator::always("0.9")),
            Arc::new(FixedEmbedder { similarity: 0.9 }),
        );

        let mut ans = answer("La pluie vient de l'eau des nuages.");
        let evaluation = job
            .evaluate(&mut ans, &student(), &question(), &template())
            .await
            .unwrap();

        assert_eq!(evaluation.analysis.raw_score, 10.0);
        assert_eq!(evaluation.analysis.status, AnswerStatus::Excellent);
        assert_eq!(ans.score_obtained, 10.0);
        assert_eq!(ans.status, Some(AnswerStatus::Excellent));
        assert_eq!(
            evaluation.feedback.feedback_type,
            FeedbackType::Encouragement
        );
        assert!(!evaluation.feedback.content.is_empty());
    }

    #[tokio::test]
    async fn evaluate_completes_with_every_provider_call_failing() {
        let job = EvaluationJob::new(
            Arc::new(ScriptedGenerator::failing()),
            Arc::new(FixedEmbedder { similarity: 0.5 }),
        );

        // "eau" matches literally; "nuage" degrades to neutral 0.5 presence,
        // below the 0.8 threshold. Coverage 0.5, grammar 1.0 -> 6.5/10.
        let mut ans = answer("Il y a de l'eau qui tombe du ciel.");
        let evaluation = job
            .evaluate(&mut ans, &student(), &question(), &template())
            .await
            .unwrap();

        assert!((evaluation.analysis.raw_score - 6.5).abs() < 1e-9);
        assert_eq!(ans.status, Some(AnswerStatus::Acceptable));
        assert!(
            evaluation
                .feedback
                .content
                .starts_with("Bravo pour ton effort !")
        );
        assert!(!evaluation.feedback.suggested_improvements.is_empty());
        assert!(!evaluation.feedback.positive_points.is_empty());
    }

    #[tokio::test]
    async fn evaluate_leaves_the_answer_untouched_on_validation_failure() {
        let job = EvaluationJob::new(
            Arc::new(ScriptedGenerator::always("0.9")),
            Arc::new(FixedEmbedder { similarity: 0.9 }),
        );

        let mut ans = answer("Une réponse.");
        ans.question_id = "q2".into();
        let err = job
            .evaluate(&mut ans, &student(), &question(), &template())
            .await
            .unwrap_err();

        assert!(matches!(err, EvaluatorError::NotFound(_)));
        assert_eq!(ans.score_obtained, 0.0);
        assert_eq!(ans.status, None);
    }

    #[tokio::test]
    async fn feedback_reflects_the_written_back_analysis() {
        let job = EvaluationJob::new(
            Arc::new(ScriptedGenerator::always("0.1")),
            Arc::new(FixedEmbedder { similarity: 0.2 }),
        );

        // Neither element matches (literal miss, presence 0.1): coverage 0,
        // grammar 1.0 -> 3.0/10, below 0.6 * minimum_score.
        let mut tpl = template();
        tpl.minimum_score = 6.0;
        let mut ans = answer("Je ne sais rien du tout.");
        let evaluation = job
            .evaluate(&mut ans, &student(), &question(), &tpl)
            .await
            .unwrap();

        assert_eq!(evaluation.analysis.status, AnswerStatus::Incorrect);
        assert_eq!(
            evaluation.feedback.feedback_type,
            FeedbackType::Explanatory
        );
        assert_eq!(evaluation.feedback.correction_details.score, 3.0);
        assert_eq!(
            evaluation.feedback.correction_details.key_elements_missing,
            vec!["eau", "nuage"]
        );
    }

    #[tokio::test]
    async fn swapping_the_generator_changes_the_whole_pipeline() {
        let job = EvaluationJob::new(
            Arc::new(ScriptedGenerator::always("0.1")),
            Arc::new(FixedEmbedder { similarity: 0.9 }),
        )
        .with_generator(Arc::new(ScriptedGenerator::always("0.9")));

        // With the swapped generator, "nuage" rates 0.9 presence and counts
        // as found despite the literal miss.
        let mut ans = answer("Il y a de l'eau qui tombe du ciel.");
        let evaluation = job
            .evaluate(&mut ans, &student(), &question(), &template())
            .await
            .unwrap();

        assert!(evaluation
            .analysis
            .key_elements_found
            .contains(&"nuage".to_string()));
        assert_eq!(evaluation.analysis.raw_score, 10.0);
    }
}
