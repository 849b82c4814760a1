//! Prompt templates for the four feedback registers.
//!
//! Each register has its own mutually exclusive template, parameterized by
//! the student's grade band (which prescribes the vocabulary level), the
//! question, the answer, the score, and the analysis evidence. The templates
//! give the generator explicit structural instructions so the downstream
//! extraction can rely on a predictable tone and ordering. The encouragement
//! register deliberately omits the model answer: a student who answered well
//! does not need the solution restated.

use crate::types::{FeedbackType, GradeBand};

/// Evidence and context a feedback prompt is built from.
pub struct PromptContext<'a> {
    pub question_text: &'a str,
    pub answer_text: &'a str,
    pub model_answer: &'a str,
    pub key_elements_found: &'a [String],
    pub key_elements_missing: &'a [String],
    pub grammar_issues: &'a [String],
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
    pub grade: GradeBand,
}

/// Prescribed vocabulary/complexity for each grade band.
pub fn language_level(grade: GradeBand) -> &'static str {
    match grade {
        GradeBand::CP => "très simple avec des mots courts et des phrases courtes",
        GradeBand::CE1 => "simple avec des phrases courtes",
        GradeBand::CE2 => "accessible avec un vocabulaire de base",
        GradeBand::CM1 => "clair et direct avec un vocabulaire varié",
        GradeBand::CM2 => "riche mais toujours accessible, avec un style encourageant",
    }
}

fn join_or_aucun(items: &[String]) -> String {
    if items.is_empty() {
        "aucun".to_string()
    } else {
        items.join(", ")
    }
}

/// Builds the content-generation prompt for the selected register.
pub fn content_prompt(feedback_type: FeedbackType, ctx: &PromptContext<'_>) -> String {
    let grade = ctx.grade;
    let level = language_level(grade);

    match feedback_type {
        FeedbackType::Encouragement => format!(
            r#"Génère un feedback positif et encourageant pour un élève de {grade}
qui a bien répondu à une question. Le langage doit être {level}.

Question: {question}

Réponse de l'élève: {answer}

Points forts:
- L'élève a inclus les éléments clés suivants: {found}
- Score obtenu: {score}/{max} ({percentage:.1}%)

Le feedback doit:
1. Féliciter l'élève spécifiquement pour les bons éléments de sa réponse
2. Souligner un ou deux points particulièrement bien faits
3. Suggérer une petite amélioration possible (même pour une excellente réponse)
4. Se terminer par un encouragement positif

Utilise un ton chaleureux et enthousiaste adapté à un élève de {grade}."#,
            question = ctx.question_text,
            answer = ctx.answer_text,
            found = join_or_aucun(ctx.key_elements_found),
            score = ctx.score,
            max = ctx.max_score,
            percentage = ctx.percentage,
        ),

        FeedbackType::Nuanced => format!(
            r#"Génère un feedback constructif pour un élève de {grade}
qui a partiellement bien répondu à une question. Le langage doit être {level}.

Question: {question}

Réponse de l'élève: {answer}

Réponse attendue: {model}

Points forts:
- L'élève a inclus les éléments clés suivants: {found}

Points à améliorer:
- Éléments manquants: {missing}
- Problèmes de grammaire: {grammar}

Score obtenu: {score}/{max} ({percentage:.1}%)

Le feedback doit:
1. Commencer par un point positif spécifique sur ce que l'élève a bien fait
2. Expliquer simplement ce qui pourrait être amélioré, en donnant 1-2 exemples concrets
3. Suggérer comment l'élève pourrait compléter sa réponse
4. Se terminer par un encouragement

Utilise un ton positif mais informatif, adapté à un élève de {grade}."#,
            question = ctx.question_text,
            answer = ctx.answer_text,
            model = ctx.model_answer,
            found = join_or_aucun(ctx.key_elements_found),
            missing = join_or_aucun(ctx.key_elements_missing),
            grammar = join_or_aucun(ctx.grammar_issues),
            score = ctx.score,
            max = ctx.max_score,
            percentage = ctx.percentage,
        ),

        FeedbackType::Corrective => format!(
            r#"Génère un feedback correctif mais bienveillant pour un élève de {grade}
qui a partiellement répondu à une question avec des lacunes importantes. Le langage doit être {level}.

Question: {question}

Réponse de l'élève: {answer}

Réponse attendue: {model}

Points forts:
- L'élève a inclus les éléments clés suivants: {found}

Points à améliorer:
- Éléments manquants: {missing}
- Problèmes de grammaire: {grammar}

Score obtenu: {score}/{max} ({percentage:.1}%)

Le feedback doit:
1. Commencer par reconnaître au moins un aspect positif de la réponse, même s'il est mineur
2. Expliquer clairement ce qui n'est pas complet ou correct
3. Montrer un exemple de meilleure réponse pour 1-2 points spécifiques
4. Donner des conseils précis sur comment mieux répondre à ce type de question
5. Se terminer par un encouragement à persévérer

Utilise un ton bienveillant et constructif, sans être décourageant, adapté à un élève de {grade}."#,
            question = ctx.question_text,
            answer = ctx.answer_text,
            model = ctx.model_answer,
            found = join_or_aucun(ctx.key_elements_found),
            missing = join_or_aucun(ctx.key_elements_missing),
            grammar = join_or_aucun(ctx.grammar_issues),
            score = ctx.score,
            max = ctx.max_score,
            percentage = ctx.percentage,
        ),

        FeedbackType::Explanatory => format!(
            r#"Génère un feedback explicatif et pédagogique pour un élève de {grade}
qui n'a pas correctement répondu à une question. Le langage doit être {level}.

Question: {question}

Réponse de l'élève: {answer}

Réponse attendue: {model}

Points à améliorer:
- Éléments manquants: {missing}
- Problèmes de grammaire: {grammar}

Score obtenu: {score}/{max} ({percentage:.1}%)

Le feedback doit:
1. Commencer par une phrase encourageante pour l'effort fourni
2. Expliquer simplement pourquoi la réponse n'est pas correcte
3. Présenter clairement les éléments qui auraient dû figurer dans la réponse
4. Donner un exemple concret de bonne réponse, adapté au niveau
5. Suggérer une méthode ou une stratégie pour mieux comprendre ce type de question
6. Se terminer par un encouragement à réessayer

Utilise un ton pédagogique et patient, sans être condescendant, adapté à un élève de {grade}."#,
            question = ctx.question_text,
            answer = ctx.answer_text,
            model = ctx.model_answer,
            missing = join_or_aucun(ctx.key_elements_missing),
            grammar = join_or_aucun(ctx.grammar_issues),
            score = ctx.score,
            max = ctx.max_score,
            percentage = ctx.percentage,
        ),
    }
}

/// Builds the second-pass prompt asking the generator to re-read its own
/// feedback and emit the two fixed sections the extraction parser expects.
pub fn extraction_prompt(feedback_content: &str) -> String {
    format!(
        r#"Analyse le feedback suivant destiné à un élève et extrais:
1. Les suggestions d'amélioration (maximum 3)
2. Les points positifs mentionnés (maximum 3)

Format de réponse:
SUGGESTIONS:
- suggestion 1
- suggestion 2
- suggestion 3

POINTS POSITIFS:
- point positif 1
- point positif 2
- point positif 3

Feedback à analyser:
{feedback_content}"#
    )
}
