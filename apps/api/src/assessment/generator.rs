//! Technical test generation — pluggable, trait-based generator producing the
//! fixed 10-question, 4-option multiple-choice test.
//!
//! Default: `FixedBankGenerator` (deterministic bank of general
//! software-engineering questions). Optional: `AiTestGenerator`, calibrated to
//! the job title, skills and experience level, which falls back to the fixed
//! bank when the provider errors or returns a malformed test.
//!
//! Idempotency per application is enforced at the persistence layer, not
//! here: once a test is stored, later fetches return the stored questions.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use crate::ai_client::prompts::test_generation_prompt;
use crate::ai_client::AiClient;
use crate::models::technical_test::Question;
use crate::screening::scoring::ExperienceLevel;

pub const QUESTION_COUNT: usize = 10;
pub const OPTIONS_PER_QUESTION: usize = 4;

const AI_GENERATION_TEMPERATURE: f32 = 0.7;
const AI_SKILLS_LIMIT: usize = 3;

/// Experience bracket used to calibrate test generation, derived from the
/// stored CV fit score.
pub fn experience_level_for_score(score: i32) -> ExperienceLevel {
    if score >= 80 {
        ExperienceLevel::Senior
    } else if score >= 60 {
        ExperienceLevel::MidLevel
    } else {
        ExperienceLevel::Junior
    }
}

/// The test generator trait. Every backend must honor the 10-question,
/// 4-option contract; the signature is infallible because a test must always
/// be produced (AI backends resolve failures by falling back locally).
#[async_trait]
pub trait TestGenerator: Send + Sync {
    async fn generate(
        &self,
        job_title: &str,
        skills: &[String],
        level: ExperienceLevel,
    ) -> Vec<Question>;
}

/// The fixed fallback bank: 10 general software-engineering questions with
/// pre-defined correct answers. Reproduced verbatim for compatibility with
/// previously stored tests — do not edit the wording or the answer indices.
pub fn fallback_questions() -> Vec<Question> {
    fn q(question: &str, options: [&str; 4], correct_answer: usize) -> Question {
        Question {
            question: question.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_answer,
        }
    }

    vec![
        q(
            "Qu'est-ce que HTML?",
            [
                "Langage de programmation",
                "Langage de balisage",
                "Base de données",
                "Serveur",
            ],
            1,
        ),
        q(
            "Différence entre '==' et '===' en JavaScript?",
            ["Aucune", "Type et valeur", "Vitesse", "Obsolète"],
            1,
        ),
        q(
            "Qu'est-ce que CSS?",
            ["Programmation", "Style", "Base", "Framework"],
            1,
        ),
        q(
            "Que signifie API?",
            [
                "Application Programming Interface",
                "Advanced Programming",
                "Automated Program",
                "Application Process",
            ],
            0,
        ),
        q(
            "Qu'est-ce que Git?",
            ["Éditeur", "Contrôle de version", "Langage", "Base"],
            1,
        ),
        q(
            "Quelle est la fonction principale d'une base de données SQL?",
            [
                "Stocker des données structurées",
                "Créer des interfaces",
                "Gérer le réseau",
                "Compiler du code",
            ],
            0,
        ),
        q(
            "Qu'est-ce qu'un algorithme?",
            [
                "Un langage de programmation",
                "Une suite d'instructions",
                "Un type de base de données",
                "Un composant matériel",
            ],
            1,
        ),
        q(
            "Quel est le rôle principal d'un système d'exploitation?",
            [
                "Créer des sites web",
                "Gérer les ressources matérielles",
                "Programmer des applications",
                "Stocker des données",
            ],
            1,
        ),
        q(
            "Qu'est-ce qu'un framework en développement logiciel?",
            [
                "Un langage de programmation",
                "Une structure de base pour développer",
                "Un type de serveur",
                "Un système d'exploitation",
            ],
            1,
        ),
        q(
            "Qu'est-ce que le cloud computing?",
            [
                "Stockage de données en ligne",
                "Programmation en réseau",
                "Création de sites web",
                "Analyse de données",
            ],
            0,
        ),
    ]
}

/// Deterministic generator returning the fixed bank. Ignores its inputs:
/// the bank is the provider-independent baseline.
pub struct FixedBankGenerator;

#[async_trait]
impl TestGenerator for FixedBankGenerator {
    async fn generate(
        &self,
        _job_title: &str,
        _skills: &[String],
        _level: ExperienceLevel,
    ) -> Vec<Question> {
        fallback_questions()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// AI-backed generator
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GeneratedTestPayload {
    #[serde(default)]
    questions: Vec<Question>,
}

/// Provider-backed generator. A response that is not exactly 10 questions of
/// 4 options with an in-range answer index is discarded in favor of the
/// fixed bank.
pub struct AiTestGenerator {
    client: AiClient,
}

impl AiTestGenerator {
    pub fn new(client: AiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TestGenerator for AiTestGenerator {
    async fn generate(
        &self,
        job_title: &str,
        skills: &[String],
        level: ExperienceLevel,
    ) -> Vec<Question> {
        let prompt = test_generation_prompt(
            job_title,
            &skills[..skills.len().min(AI_SKILLS_LIMIT)],
            level.as_str(),
        );

        match self
            .client
            .call_json::<GeneratedTestPayload>(&prompt, AI_GENERATION_TEMPERATURE)
            .await
        {
            Ok(payload) if valid_test(&payload.questions) => payload.questions,
            Ok(payload) => {
                warn!(
                    "AI generator returned a malformed test ({} questions), using fixed bank",
                    payload.questions.len()
                );
                fallback_questions()
            }
            Err(e) => {
                warn!("AI test generation failed, using fixed bank: {e}");
                fallback_questions()
            }
        }
    }
}

/// Validates the 10-question / 4-option / in-range-answer contract.
fn valid_test(questions: &[Question]) -> bool {
    questions.len() == QUESTION_COUNT
        && questions.iter().all(|q| {
            !q.question.trim().is_empty()
                && q.options.len() == OPTIONS_PER_QUESTION
                && q.correct_answer < q.options.len()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_bank_has_ten_questions_of_four_options() {
        let questions = FixedBankGenerator
            .generate("Ingénieur", &[], ExperienceLevel::Junior)
            .await;
        assert_eq!(questions.len(), QUESTION_COUNT);
        for q in &questions {
            assert_eq!(q.options.len(), OPTIONS_PER_QUESTION);
            assert!(q.correct_answer < q.options.len());
        }
    }

    #[test]
    fn test_first_question_is_reproduced_verbatim() {
        let first = &fallback_questions()[0];
        assert_eq!(first.question, "Qu'est-ce que HTML?");
        assert_eq!(
            first.options,
            vec![
                "Langage de programmation",
                "Langage de balisage",
                "Base de données",
                "Serveur"
            ]
        );
        assert_eq!(first.correct_answer, 1);
    }

    #[test]
    fn test_fixed_bank_answer_key() {
        let answers: Vec<usize> = fallback_questions()
            .iter()
            .map(|q| q.correct_answer)
            .collect();
        assert_eq!(answers, vec![1, 1, 1, 0, 1, 0, 1, 1, 1, 0]);
    }

    #[test]
    fn test_fixed_bank_is_deterministic() {
        assert_eq!(fallback_questions(), fallback_questions());
    }

    #[test]
    fn test_experience_level_brackets() {
        assert_eq!(experience_level_for_score(85), ExperienceLevel::Senior);
        assert_eq!(experience_level_for_score(80), ExperienceLevel::Senior);
        assert_eq!(experience_level_for_score(65), ExperienceLevel::MidLevel);
        assert_eq!(experience_level_for_score(60), ExperienceLevel::MidLevel);
        assert_eq!(experience_level_for_score(59), ExperienceLevel::Junior);
        assert_eq!(experience_level_for_score(0), ExperienceLevel::Junior);
    }

    #[test]
    fn test_valid_test_rejects_wrong_shapes() {
        let mut questions = fallback_questions();
        assert!(valid_test(&questions));

        questions[3].correct_answer = 4; // out of range
        assert!(!valid_test(&questions));

        let mut short = fallback_questions();
        short.pop();
        assert!(!valid_test(&short));

        let mut three_options = fallback_questions();
        three_options[0].options.pop();
        assert!(!valid_test(&three_options));
    }
}
