//! Test grading: scores submitted answer indices against the stored answer
//! key. Pure and deterministic; the at-most-once guarantee lives in the
//! submission handler's guarded UPDATE.

use serde::Serialize;

use crate::models::technical_test::Question;
use crate::screening::status::TEST_PASS_THRESHOLD;

/// Outcome of grading one test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TestResult {
    /// 0–100, rounded percentage of correct answers.
    pub score: i32,
    pub passed: bool,
}

/// Grades submitted answers against the question sequence.
///
/// A missing or out-of-range answer at position `i` counts as incorrect,
/// never as an error: partial submissions still produce a valid score.
/// Answers are `i64` so that any numeric JSON input is accepted as-is.
pub fn grade(questions: &[Question], answers: &[i64]) -> TestResult {
    if questions.is_empty() {
        return TestResult {
            score: 0,
            passed: false,
        };
    }

    let correct = questions
        .iter()
        .enumerate()
        .filter(|(i, q)| answers.get(*i).copied() == Some(q.correct_answer as i64))
        .count();

    let score = ((correct as f64 / questions.len() as f64) * 100.0).round() as i32;

    TestResult {
        score,
        passed: score >= TEST_PASS_THRESHOLD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::generator::fallback_questions;

    /// Answers matching the fixed bank's key, mutated per test case.
    fn correct_answers() -> Vec<i64> {
        fallback_questions()
            .iter()
            .map(|q| q.correct_answer as i64)
            .collect()
    }

    #[test]
    fn test_eight_of_ten_correct_scores_80_and_passes() {
        let questions = fallback_questions();
        let mut answers = correct_answers();
        // Wrong at positions 8 and 9
        answers[8] = (questions[8].correct_answer as i64 + 1) % 4;
        answers[9] = (questions[9].correct_answer as i64 + 1) % 4;

        let result = grade(&questions, &answers);
        assert_eq!(result.score, 80);
        assert!(result.passed);
    }

    #[test]
    fn test_five_of_ten_correct_scores_50_and_fails() {
        let questions = fallback_questions();
        let mut answers = correct_answers();
        for i in 5..10 {
            answers[i] = (questions[i].correct_answer as i64 + 1) % 4;
        }

        let result = grade(&questions, &answers);
        assert_eq!(result.score, 50);
        assert!(!result.passed);
    }

    #[test]
    fn test_perfect_and_zero_scores() {
        let questions = fallback_questions();
        assert_eq!(
            grade(&questions, &correct_answers()),
            TestResult {
                score: 100,
                passed: true
            }
        );
        assert_eq!(grade(&questions, &vec![-1; 10]).score, 0);
    }

    #[test]
    fn test_partial_submission_counts_missing_as_incorrect() {
        let questions = fallback_questions();
        let answers: Vec<i64> = correct_answers().into_iter().take(6).collect();

        let result = grade(&questions, &answers);
        assert_eq!(result.score, 60);
        assert!(result.passed);
    }

    #[test]
    fn test_out_of_range_answers_are_incorrect_not_errors() {
        let questions = fallback_questions();
        let result = grade(&questions, &[99, -5, 1, 0, 1, 0, 1, 1, 1, 0]);
        // Positions 2..10 match the key (8 correct), 0 and 1 do not.
        assert_eq!(result.score, 80);
    }

    #[test]
    fn test_extra_answers_are_ignored() {
        let questions = fallback_questions();
        let mut answers = correct_answers();
        answers.extend([3, 3, 3]);
        assert_eq!(grade(&questions, &answers).score, 100);
    }

    #[test]
    fn test_pass_mark_is_60() {
        let questions = fallback_questions();
        let mut answers = correct_answers();
        for i in 6..10 {
            answers[i] = (questions[i].correct_answer as i64 + 1) % 4;
        }
        let result = grade(&questions, &answers);
        assert_eq!(result.score, 60);
        assert!(result.passed);
    }

    #[test]
    fn test_empty_question_set_scores_zero() {
        assert_eq!(
            grade(&[], &[1, 2, 3]),
            TestResult {
                score: 0,
                passed: false
            }
        );
    }
}
