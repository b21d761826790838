//! Axum route handlers for application screening: submission (CV scoring +
//! initial status) and the recruiter/candidate listing views.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{ApplicationRow, ApplicationSummaryRow, CandidateApplicationRow};
use crate::models::candidate::CandidateRow;
use crate::models::job::JobOfferRow;
use crate::screening::skills::extract_skills;
use crate::screening::status::status_for_cv_score;
use crate::state::AppState;
use crate::storage::extract::cv_text_from_bytes;

#[derive(Debug, Deserialize)]
pub struct SubmitApplicationRequest {
    pub candidate_id: Uuid,
}

/// POST /api/v1/offers/:id/applications
///
/// Submits an application: loads the candidate's CV, scores it against the
/// offer's skills, derives the initial status, and persists the application.
/// Fails with DUPLICATE_APPLICATION if one already exists for this
/// (candidate, offer) pair and with MISSING_CV if no CV has been uploaded.
/// A failed submission leaves no partial row behind.
pub async fn handle_submit_application(
    State(state): State<AppState>,
    Path(offer_id): Path<Uuid>,
    Json(request): Json<SubmitApplicationRequest>,
) -> Result<(StatusCode, Json<ApplicationRow>), AppError> {
    let offer = fetch_offer(&state, offer_id).await?;

    let candidate: CandidateRow = sqlx::query_as("SELECT * FROM candidates WHERE id = $1")
        .bind(request.candidate_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {} not found", request.candidate_id)))?;

    // Duplicate submission is rejected before any scoring runs. Cheap
    // pre-check; the unique constraint is the real guard under races.
    let existing: Option<(Uuid,)> = sqlx::query_as(
        "SELECT id FROM applications WHERE candidate_id = $1 AND job_offer_id = $2",
    )
    .bind(candidate.id)
    .bind(offer.id)
    .fetch_optional(&state.db)
    .await?;
    if existing.is_some() {
        return Err(AppError::DuplicateApplication);
    }

    let cv_key = candidate.cv_key.as_deref().ok_or(AppError::MissingCv)?;

    // An unreadable CV is scored as empty text, never surfaced as a failure.
    let cv_text = match state.cv_store.get(cv_key).await {
        Ok(bytes) => cv_text_from_bytes(cv_key, &bytes),
        Err(e) => {
            warn!("CV '{cv_key}' unavailable for candidate {}: {e}", candidate.id);
            String::new()
        }
    };

    // Structured skills when the recruiter provided them; otherwise extract
    // from the free-text description (never empty: defaults apply).
    let skills = if offer.skills.is_empty() {
        extract_skills(&offer.description)
    } else {
        offer.skills.clone()
    };

    let analysis = state
        .cv_scorer
        .score(&cv_text, &offer.description, &skills)
        .await;

    let status = status_for_cv_score(analysis.score);
    let summary = format!(
        "Compétences: {}. Expérience: {}. Niveau: {}.",
        analysis.skills.join(", "),
        analysis.experience,
        analysis.experience_level.as_str()
    );

    let application: ApplicationRow = sqlx::query_as(
        r#"
        INSERT INTO applications (id, candidate_id, job_offer_id, status, ai_score, ai_analysis)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(candidate.id)
    .bind(offer.id)
    .bind(status)
    .bind(analysis.score)
    .bind(&summary)
    .fetch_one(&state.db)
    .await
    .map_err(|e| {
        let err = AppError::from(e);
        if err.is_unique_violation() {
            AppError::DuplicateApplication
        } else {
            err
        }
    })?;

    info!(
        "Application {} created for offer '{}': score={}, status={}",
        application.id,
        offer.title,
        analysis.score,
        status.as_str()
    );

    Ok((StatusCode::CREATED, Json(application)))
}

/// GET /api/v1/offers/:id/applications
///
/// Recruiter view: all applications for an offer with candidate identity and
/// technical test outcome.
pub async fn handle_list_offer_applications(
    State(state): State<AppState>,
    Path(offer_id): Path<Uuid>,
) -> Result<Json<Vec<ApplicationSummaryRow>>, AppError> {
    // 404 on unknown offers rather than an empty list
    fetch_offer(&state, offer_id).await?;

    let applications = sqlx::query_as::<_, ApplicationSummaryRow>(
        r#"
        SELECT a.id, a.candidate_id, c.name AS candidate_name, c.email AS candidate_email,
               a.status, a.ai_score, a.created_at,
               t.score AS test_score, t.completed_at AS test_completed_at
        FROM applications a
        JOIN candidates c ON c.id = a.candidate_id
        LEFT JOIN technical_tests t ON t.application_id = a.id
        WHERE a.job_offer_id = $1
        ORDER BY a.created_at DESC
        "#,
    )
    .bind(offer_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(applications))
}

/// GET /api/v1/candidates/:id/applications
///
/// Candidate view: their own applications with offer title and company.
pub async fn handle_list_candidate_applications(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
) -> Result<Json<Vec<CandidateApplicationRow>>, AppError> {
    let applications = sqlx::query_as::<_, CandidateApplicationRow>(
        r#"
        SELECT a.id, a.job_offer_id, j.title AS job_title, j.company_name,
               a.status, a.ai_score, a.created_at
        FROM applications a
        JOIN job_offers j ON j.id = a.job_offer_id
        WHERE a.candidate_id = $1
        ORDER BY a.created_at DESC
        "#,
    )
    .bind(candidate_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(applications))
}

/// GET /api/v1/applications/:id
pub async fn handle_get_application(
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
) -> Result<Json<ApplicationRow>, AppError> {
    let application: ApplicationRow = sqlx::query_as("SELECT * FROM applications WHERE id = $1")
        .bind(application_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {application_id} not found")))?;

    Ok(Json(application))
}

async fn fetch_offer(state: &AppState, offer_id: Uuid) -> Result<JobOfferRow, AppError> {
    sqlx::query_as("SELECT * FROM job_offers WHERE id = $1")
        .bind(offer_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job offer {offer_id} not found")))
}
