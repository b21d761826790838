use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A candidate account. `cv_key` points into the CV store; a candidate has at
/// most one CV at a time and re-upload replaces it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub cv_key: Option<String>,
    pub created_at: DateTime<Utc>,
}
