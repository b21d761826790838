mod ai_client;
mod assessment;
mod candidates;
mod config;
mod db;
mod errors;
mod models;
mod offers;
mod routes;
mod screening;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ai_client::AiClient;
use crate::assessment::generator::{AiTestGenerator, FixedBankGenerator, TestGenerator};
use crate::config::{Config, CvStorageBackend};
use crate::db::create_pool;
use crate::routes::build_router;
use crate::screening::scoring::{AiCvScorer, CvScorer, HeuristicCvScorer};
use crate::state::AppState;
use crate::storage::local::LocalCvStore;
use crate::storage::s3::{build_s3_client, S3CvStore};
use crate::storage::CvStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Screening API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize CV storage
    let cv_store: Arc<dyn CvStore> = match config.cv_storage {
        CvStorageBackend::Local => {
            info!("CV store: local disk at '{}'", config.upload_dir);
            Arc::new(LocalCvStore::new(config.upload_dir.clone()))
        }
        CvStorageBackend::S3 => {
            let client = build_s3_client(&config).await;
            info!("CV store: S3 bucket '{}'", config.s3_bucket);
            Arc::new(S3CvStore::new(client, config.s3_bucket.clone()))
        }
    };

    // Initialize scorer and generator. With no provider key, the
    // deterministic local implementations run alone; with one, the AI
    // backends run with the local algorithms as their fallback.
    let (cv_scorer, test_generator): (Arc<dyn CvScorer>, Arc<dyn TestGenerator>) =
        match &config.openai_api_key {
            Some(key) => {
                let ai = AiClient::new(key.clone(), config.openai_base_url.clone());
                info!("AI provider enabled (model: {})", ai_client::MODEL);
                (
                    Arc::new(AiCvScorer::new(ai.clone())),
                    Arc::new(AiTestGenerator::new(ai)),
                )
            }
            None => {
                info!("No AI provider configured, using deterministic local pipeline");
                (Arc::new(HeuristicCvScorer), Arc::new(FixedBankGenerator))
            }
        };

    // Build app state
    let state = AppState {
        db,
        cv_store,
        cv_scorer,
        test_generator,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
