pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::assessment::handlers as assessment;
use crate::candidates::handlers as candidates;
use crate::offers::handlers as offers;
use crate::screening::handlers as screening;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Job offers
        .route(
            "/api/v1/offers",
            post(offers::handle_create_offer).get(offers::handle_list_offers),
        )
        .route("/api/v1/offers/:id", get(offers::handle_get_offer))
        // Candidates
        .route("/api/v1/candidates", post(candidates::handle_create_candidate))
        .route(
            "/api/v1/candidates/:id",
            get(candidates::handle_get_candidate),
        )
        .route("/api/v1/candidates/:id/cv", put(candidates::handle_upload_cv))
        .route(
            "/api/v1/candidates/:id/applications",
            get(screening::handle_list_candidate_applications),
        )
        // Applications (screening pipeline)
        .route(
            "/api/v1/offers/:id/applications",
            post(screening::handle_submit_application)
                .get(screening::handle_list_offer_applications),
        )
        .route(
            "/api/v1/applications/:id",
            get(screening::handle_get_application),
        )
        // Technical tests
        .route(
            "/api/v1/applications/:id/test",
            get(assessment::handle_get_test).post(assessment::handle_submit_answers),
        )
        .with_state(state)
}
