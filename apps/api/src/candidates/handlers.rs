//! Axum route handlers for candidates: account creation and CV upload.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::CandidateRow;
use crate::state::AppState;

const ALLOWED_CV_CONTENT_TYPES: &[&str] = &["application/pdf", "text/plain"];

#[derive(Debug, Deserialize)]
pub struct CreateCandidateRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct CvUploadResponse {
    pub message: String,
    pub cv_key: String,
}

/// POST /api/v1/candidates
pub async fn handle_create_candidate(
    State(state): State<AppState>,
    Json(request): Json<CreateCandidateRequest>,
) -> Result<(StatusCode, Json<CandidateRow>), AppError> {
    if request.name.trim().is_empty() || request.email.trim().is_empty() {
        return Err(AppError::Validation(
            "name and email cannot be empty".to_string(),
        ));
    }

    let candidate: CandidateRow = sqlx::query_as(
        "INSERT INTO candidates (id, name, email) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(request.name.trim())
    .bind(request.email.trim())
    .fetch_one(&state.db)
    .await
    .map_err(|e| {
        let err = AppError::from(e);
        if err.is_unique_violation() {
            AppError::Validation("A candidate with this email already exists".to_string())
        } else {
            err
        }
    })?;

    Ok((StatusCode::CREATED, Json(candidate)))
}

/// GET /api/v1/candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
) -> Result<Json<CandidateRow>, AppError> {
    let candidate: CandidateRow = sqlx::query_as("SELECT * FROM candidates WHERE id = $1")
        .bind(candidate_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;

    Ok(Json(candidate))
}

/// PUT /api/v1/candidates/:id/cv
///
/// Multipart CV upload (field `cv`, PDF or plain text). Stores the document
/// in the CV store and replaces the candidate's `cv_key` — a candidate has at
/// most one CV at a time.
pub async fn handle_upload_cv(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<CvUploadResponse>, AppError> {
    let candidate: CandidateRow = sqlx::query_as("SELECT * FROM candidates WHERE id = $1")
        .bind(candidate_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;

    let mut upload: Option<(String, bytes::Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some("cv") {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !ALLOWED_CV_CONTENT_TYPES.contains(&content_type.as_str()) {
            return Err(AppError::Validation(
                "Unsupported file type. Use PDF or TXT.".to_string(),
            ));
        }

        let file_name = field.file_name().unwrap_or("cv").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;

        upload = Some((file_name, bytes));
        break;
    }

    let (file_name, bytes) = upload
        .ok_or_else(|| AppError::Validation("No 'cv' file field provided".to_string()))?;

    if bytes.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }

    let extension = file_name.rsplit('.').next().unwrap_or("txt");
    let cv_key = format!("cv-{}.{}", slugify(&candidate.name), extension);

    state.cv_store.put(&cv_key, bytes).await?;

    sqlx::query("UPDATE candidates SET cv_key = $1 WHERE id = $2")
        .bind(&cv_key)
        .bind(candidate.id)
        .execute(&state.db)
        .await?;

    info!("CV uploaded for candidate {}: {}", candidate.id, cv_key);

    Ok(Json(CvUploadResponse {
        message: "CV uploadé avec succès".to_string(),
        cv_key,
    }))
}

/// Lowercase, spaces to dashes, anything outside [a-z0-9-] dropped.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.to_lowercase().chars() {
        if c.is_whitespace() {
            slug.push('-');
        } else if c.is_ascii_alphanumeric() || c == '-' {
            slug.push(c);
        }
    }
    if slug.is_empty() {
        "candidat".to_string()
    } else {
        slug
    }
}
