//! Axum route handlers for the technical test lifecycle: idempotent
//! fetch-or-create and at-most-once grading.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::assessment::generator::experience_level_for_score;
use crate::assessment::grading::grade;
use crate::errors::AppError;
use crate::models::application::ApplicationRow;
use crate::models::job::JobOfferRow;
use crate::models::technical_test::TechnicalTestRow;
use crate::screening::status::{apply_test_result, ApplicationStatus};
use crate::state::AppState;

/// A question as shown to the candidate: the correct-answer index stays
/// server-side.
#[derive(Debug, Serialize)]
pub struct QuestionView {
    pub question: String,
    pub options: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TestResponse {
    pub questions: Vec<QuestionView>,
    pub job_title: String,
    pub company_name: String,
    pub completed: bool,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAnswersRequest {
    pub answers: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct SubmitAnswersResponse {
    pub score: i32,
    pub passed: bool,
    pub status: ApplicationStatus,
}

/// GET /api/v1/applications/:id/test
///
/// Returns the application's technical test, generating and persisting it on
/// first access. Generation happens at most once per application: the unique
/// constraint on application_id resolves concurrent first fetches, and later
/// calls always return the stored questions — a candidate cannot re-roll.
/// Fails with NOT_ELIGIBLE unless the application is TEST_PENDING or ACCEPTED.
pub async fn handle_get_test(
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
) -> Result<Json<TestResponse>, AppError> {
    let application = fetch_application(&state, application_id).await?;

    if !application.status.can_take_test() {
        return Err(AppError::NotEligible(format!(
            "Test not available for an application in status {}",
            application.status.as_str()
        )));
    }

    let offer: JobOfferRow = sqlx::query_as("SELECT * FROM job_offers WHERE id = $1")
        .bind(application.job_offer_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Job offer {} not found", application.job_offer_id))
        })?;

    let test = fetch_or_create_test(&state, &application, &offer).await?;

    let questions = test
        .parsed_questions()?
        .into_iter()
        .map(|q| QuestionView {
            question: q.question,
            options: q.options,
        })
        .collect();

    Ok(Json(TestResponse {
        questions,
        job_title: offer.title,
        company_name: offer.company_name,
        completed: test.completed_at.is_some(),
    }))
}

/// POST /api/v1/applications/:id/test
///
/// Grades submitted answers, records the result, and advances the
/// application status — all in one transaction, guarded so a test is graded
/// at most once even under concurrent submissions.
pub async fn handle_submit_answers(
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
    Json(request): Json<SubmitAnswersRequest>,
) -> Result<Json<SubmitAnswersResponse>, AppError> {
    let application = fetch_application(&state, application_id).await?;

    let test: TechnicalTestRow =
        sqlx::query_as("SELECT * FROM technical_tests WHERE application_id = $1")
            .bind(application.id)
            .fetch_optional(&state.db)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No test found for application {application_id}"))
            })?;

    if test.completed_at.is_some() {
        return Err(AppError::AlreadyCompleted);
    }

    let questions = test.parsed_questions()?;
    let result = grade(&questions, &request.answers);
    let new_status = apply_test_result(application.status, result.score);

    // Single transaction: the guarded UPDATE wins any race with a concurrent
    // submission, and the status change commits with the grade or not at all.
    let mut tx = state.db.begin().await?;

    let updated = sqlx::query(
        r#"
        UPDATE technical_tests
        SET answers = $1, score = $2, completed_at = NOW()
        WHERE id = $3 AND completed_at IS NULL
        "#,
    )
    .bind(json!(request.answers))
    .bind(result.score)
    .bind(test.id)
    .execute(&mut *tx)
    .await?;

    if updated.rows_affected() == 0 {
        tx.rollback().await?;
        return Err(AppError::AlreadyCompleted);
    }

    sqlx::query("UPDATE applications SET status = $1 WHERE id = $2")
        .bind(new_status)
        .bind(application.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!(
        "Test {} graded for application {}: score={}, status={}",
        test.id,
        application.id,
        result.score,
        new_status.as_str()
    );

    Ok(Json(SubmitAnswersResponse {
        score: result.score,
        passed: result.passed,
        status: new_status,
    }))
}

/// Returns the stored test for this application, generating and inserting it
/// first if none exists. `ON CONFLICT DO NOTHING` plus the re-select makes
/// concurrent first accesses converge on a single stored question set.
async fn fetch_or_create_test(
    state: &AppState,
    application: &ApplicationRow,
    offer: &JobOfferRow,
) -> Result<TechnicalTestRow, AppError> {
    let existing: Option<TechnicalTestRow> =
        sqlx::query_as("SELECT * FROM technical_tests WHERE application_id = $1")
            .bind(application.id)
            .fetch_optional(&state.db)
            .await?;

    if let Some(test) = existing {
        return Ok(test);
    }

    let level = experience_level_for_score(application.ai_score.unwrap_or(0));
    let questions = state
        .test_generator
        .generate(&offer.title, &offer.skills, level)
        .await;

    sqlx::query(
        r#"
        INSERT INTO technical_tests (id, application_id, candidate_id, questions)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (application_id) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(application.id)
    .bind(application.candidate_id)
    .bind(json!(questions))
    .execute(&state.db)
    .await?;

    let test: TechnicalTestRow =
        sqlx::query_as("SELECT * FROM technical_tests WHERE application_id = $1")
            .bind(application.id)
            .fetch_one(&state.db)
            .await?;

    Ok(test)
}

async fn fetch_application(
    state: &AppState,
    application_id: Uuid,
) -> Result<ApplicationRow, AppError> {
    sqlx::query_as("SELECT * FROM applications WHERE id = $1")
        .bind(application_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {application_id} not found")))
}
