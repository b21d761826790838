use std::sync::Arc;

use sqlx::PgPool;

use crate::assessment::generator::TestGenerator;
use crate::config::Config;
use crate::screening::scoring::CvScorer;
use crate::storage::CvStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Opaque CV document store. Local disk by default; S3/MinIO via config.
    pub cv_store: Arc<dyn CvStore>,
    /// Pluggable CV scorer. Deterministic heuristic by default; AI-backed
    /// (with built-in fallback) when OPENAI_API_KEY is set.
    pub cv_scorer: Arc<dyn CvScorer>,
    /// Pluggable test generator, same swap rule as the scorer.
    pub test_generator: Arc<dyn TestGenerator>,
    pub config: Config,
}
