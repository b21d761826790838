//! Axum route handlers for job offers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::JobOfferRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateOfferRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub skills: Vec<String>,
    pub company_name: String,
    pub recruiter_id: Uuid,
}

/// POST /api/v1/offers
pub async fn handle_create_offer(
    State(state): State<AppState>,
    Json(request): Json<CreateOfferRequest>,
) -> Result<(StatusCode, Json<JobOfferRow>), AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    if request.description.trim().is_empty() {
        return Err(AppError::Validation(
            "description cannot be empty".to_string(),
        ));
    }

    let offer: JobOfferRow = sqlx::query_as(
        r#"
        INSERT INTO job_offers (id, title, description, skills, company_name, recruiter_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(request.title.trim())
    .bind(request.description.trim())
    .bind(&request.skills)
    .bind(request.company_name.trim())
    .bind(request.recruiter_id)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(offer)))
}

/// GET /api/v1/offers
pub async fn handle_list_offers(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobOfferRow>>, AppError> {
    let offers =
        sqlx::query_as::<_, JobOfferRow>("SELECT * FROM job_offers ORDER BY created_at DESC")
            .fetch_all(&state.db)
            .await?;

    Ok(Json(offers))
}

/// GET /api/v1/offers/:id
pub async fn handle_get_offer(
    State(state): State<AppState>,
    Path(offer_id): Path<Uuid>,
) -> Result<Json<JobOfferRow>, AppError> {
    let offer: JobOfferRow = sqlx::query_as("SELECT * FROM job_offers WHERE id = $1")
        .bind(offer_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job offer {offer_id} not found")))?;

    Ok(Json(offer))
}
