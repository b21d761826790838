//! Application state machine: the closed status enumeration and the single
//! canonical threshold table consulted everywhere. All transitions go
//! through the functions here; handlers never pick a status by hand.

use serde::{Deserialize, Serialize};

/// Lifecycle status of an application.
///
/// `Pending` is transient (CV not yet scored); `Accepted` and `Rejected` are
/// terminal for this pipeline. Stored as a Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "application_status")]
pub enum ApplicationStatus {
    #[sqlx(rename = "PENDING")]
    Pending,
    #[sqlx(rename = "REJECTED")]
    Rejected,
    #[sqlx(rename = "TEST_PENDING")]
    TestPending,
    #[sqlx(rename = "ACCEPTED")]
    Accepted,
}

/// CV score at or above which an application is accepted outright.
pub const CV_ACCEPT_THRESHOLD: i32 = 70;
/// CV score at or above which a candidate qualifies for the technical test.
pub const CV_TEST_THRESHOLD: i32 = 50;
/// Technical test score at or above which the candidate passes.
pub const TEST_PASS_THRESHOLD: i32 = 60;

impl ApplicationStatus {
    /// Whether the technical test may be fetched in this status. Accepted
    /// applications keep test access (strong-CV candidates may still take it).
    pub fn can_take_test(&self) -> bool {
        matches!(self, ApplicationStatus::TestPending | ApplicationStatus::Accepted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "PENDING",
            ApplicationStatus::Rejected => "REJECTED",
            ApplicationStatus::TestPending => "TEST_PENDING",
            ApplicationStatus::Accepted => "ACCEPTED",
        }
    }
}

/// Initial status derived from the CV fit score at application creation.
/// The only valid transition out of `Pending`.
pub fn status_for_cv_score(score: i32) -> ApplicationStatus {
    if score >= CV_ACCEPT_THRESHOLD {
        ApplicationStatus::Accepted
    } else if score >= CV_TEST_THRESHOLD {
        ApplicationStatus::TestPending
    } else {
        ApplicationStatus::Rejected
    }
}

/// Status resulting from a graded technical test.
pub fn status_for_test_score(score: i32) -> ApplicationStatus {
    if score >= TEST_PASS_THRESHOLD {
        ApplicationStatus::Accepted
    } else {
        ApplicationStatus::Rejected
    }
}

/// Applies a graded test result to the current status.
///
/// Only `TestPending` transitions on grading. An `Accepted` application that
/// takes the optional test keeps its status regardless of outcome: no edge
/// leads out of a terminal state.
pub fn apply_test_result(current: ApplicationStatus, test_score: i32) -> ApplicationStatus {
    match current {
        ApplicationStatus::TestPending => status_for_test_score(test_score),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_cv_score_accepts_directly() {
        assert_eq!(status_for_cv_score(85), ApplicationStatus::Accepted);
    }

    #[test]
    fn test_mid_cv_score_requires_test() {
        assert_eq!(status_for_cv_score(60), ApplicationStatus::TestPending);
    }

    #[test]
    fn test_low_cv_score_rejects() {
        assert_eq!(status_for_cv_score(30), ApplicationStatus::Rejected);
    }

    #[test]
    fn test_accept_threshold_is_inclusive() {
        assert_eq!(status_for_cv_score(70), ApplicationStatus::Accepted);
        assert_eq!(status_for_cv_score(69), ApplicationStatus::TestPending);
    }

    #[test]
    fn test_test_threshold_is_inclusive() {
        assert_eq!(status_for_cv_score(50), ApplicationStatus::TestPending);
        assert_eq!(status_for_cv_score(49), ApplicationStatus::Rejected);
    }

    #[test]
    fn test_passing_test_score_accepts() {
        assert_eq!(status_for_test_score(60), ApplicationStatus::Accepted);
        assert_eq!(status_for_test_score(80), ApplicationStatus::Accepted);
    }

    #[test]
    fn test_failing_test_score_rejects() {
        assert_eq!(status_for_test_score(59), ApplicationStatus::Rejected);
        assert_eq!(status_for_test_score(0), ApplicationStatus::Rejected);
    }

    #[test]
    fn test_grading_transitions_only_from_test_pending() {
        assert_eq!(
            apply_test_result(ApplicationStatus::TestPending, 80),
            ApplicationStatus::Accepted
        );
        assert_eq!(
            apply_test_result(ApplicationStatus::TestPending, 50),
            ApplicationStatus::Rejected
        );
        // Accepted is terminal: a failed optional test does not demote.
        assert_eq!(
            apply_test_result(ApplicationStatus::Accepted, 10),
            ApplicationStatus::Accepted
        );
    }

    #[test]
    fn test_test_access_is_permissive_for_accepted() {
        assert!(ApplicationStatus::TestPending.can_take_test());
        assert!(ApplicationStatus::Accepted.can_take_test());
        assert!(!ApplicationStatus::Rejected.can_take_test());
        assert!(!ApplicationStatus::Pending.can_take_test());
    }

    #[test]
    fn test_status_serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&ApplicationStatus::TestPending).unwrap();
        assert_eq!(json, r#""TEST_PENDING""#);
        let back: ApplicationStatus = serde_json::from_str(r#""ACCEPTED""#).unwrap();
        assert_eq!(back, ApplicationStatus::Accepted);
    }
}
