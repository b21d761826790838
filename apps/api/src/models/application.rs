use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::screening::status::ApplicationStatus;

/// One candidate's application to one job offer. At most one row exists per
/// (candidate_id, job_offer_id) pair, enforced by a unique constraint.
///
/// `status` and `ai_score` are derived fields owned by the screening state
/// machine; candidates never mutate them directly.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub job_offer_id: Uuid,
    pub status: ApplicationStatus,
    pub ai_score: Option<i32>,
    pub ai_analysis: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Recruiter view of an application: candidate identity plus the technical
/// test outcome, if any.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ApplicationSummaryRow {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub candidate_name: String,
    pub candidate_email: String,
    pub status: ApplicationStatus,
    pub ai_score: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub test_score: Option<i32>,
    pub test_completed_at: Option<DateTime<Utc>>,
}

/// Candidate view of one of their own applications.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CandidateApplicationRow {
    pub id: Uuid,
    pub job_offer_id: Uuid,
    pub job_title: String,
    pub company_name: String,
    pub status: ApplicationStatus,
    pub ai_score: Option<i32>,
    pub created_at: DateTime<Utc>,
}
