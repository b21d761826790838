use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

/// A single multiple-choice question. Serialized field names match the stored
/// JSON payload (`correctAnswer`), so persisted tests round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: usize,
}

/// The technical test attached 1:1 to an application. Generated at most once
/// (unique constraint on application_id) and graded at most once
/// (`completed_at` set exactly when grading commits).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TechnicalTestRow {
    pub id: Uuid,
    pub application_id: Uuid,
    pub candidate_id: Uuid,
    pub questions: Value,
    pub answers: Option<Value>,
    pub score: Option<i32>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TechnicalTestRow {
    /// Deserializes the stored question bank. A malformed payload is a
    /// data-integrity failure for this request, not a gradable state.
    pub fn parsed_questions(&self) -> Result<Vec<Question>, AppError> {
        let questions: Vec<Question> = serde_json::from_value(self.questions.clone())
            .context("malformed stored question payload")?;
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_question_serializes_with_camel_case_answer_key() {
        let q = Question {
            question: "Qu'est-ce que HTML?".to_string(),
            options: vec!["a".to_string(), "b".to_string()],
            correct_answer: 1,
        };
        let value = serde_json::to_value(&q).unwrap();
        assert_eq!(value["correctAnswer"], 1);
        assert!(value.get("correct_answer").is_none());
    }

    #[test]
    fn test_parsed_questions_rejects_malformed_payload() {
        let row = TechnicalTestRow {
            id: Uuid::new_v4(),
            application_id: Uuid::new_v4(),
            candidate_id: Uuid::new_v4(),
            questions: json!({"not": "an array"}),
            answers: None,
            score: None,
            completed_at: None,
            created_at: Utc::now(),
        };
        assert!(row.parsed_questions().is_err());
    }

    #[test]
    fn test_parsed_questions_roundtrip() {
        let questions = vec![Question {
            question: "Que signifie API?".to_string(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer: 0,
        }];
        let row = TechnicalTestRow {
            id: Uuid::new_v4(),
            application_id: Uuid::new_v4(),
            candidate_id: Uuid::new_v4(),
            questions: serde_json::to_value(&questions).unwrap(),
            answers: None,
            score: None,
            completed_at: None,
            created_at: Utc::now(),
        };
        assert_eq!(row.parsed_questions().unwrap(), questions);
    }
}
