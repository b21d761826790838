use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A job offer posted by a recruiter. The skill list is read-only input to
/// CV scoring and is never mutated by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobOfferRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub skills: Vec<String>,
    pub company_name: String,
    pub recruiter_id: Uuid,
    pub created_at: DateTime<Utc>,
}
