use anyhow::{Context, Result};

/// Which backend serves CV uploads.
#[derive(Debug, Clone, PartialEq)]
pub enum CvStorageBackend {
    Local,
    S3,
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Absent means: deterministic local scorer/generator only.
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub cv_storage: CvStorageBackend,
    pub upload_dir: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let cv_storage = match std::env::var("CV_STORAGE")
            .unwrap_or_else(|_| "local".to_string())
            .as_str()
        {
            "s3" => CvStorageBackend::S3,
            _ => CvStorageBackend::Local,
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            openai_api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            upload_dir: std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            // S3 settings are only required when CV_STORAGE=s3
            s3_bucket: s3_env("S3_BUCKET", &cv_storage)?,
            s3_endpoint: s3_env("S3_ENDPOINT", &cv_storage)?,
            aws_access_key_id: s3_env("AWS_ACCESS_KEY_ID", &cv_storage)?,
            aws_secret_access_key: s3_env("AWS_SECRET_ACCESS_KEY", &cv_storage)?,
            cv_storage,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn s3_env(key: &str, backend: &CvStorageBackend) -> Result<String> {
    match backend {
        CvStorageBackend::S3 => require_env(key),
        CvStorageBackend::Local => Ok(std::env::var(key).unwrap_or_default()),
    }
}
