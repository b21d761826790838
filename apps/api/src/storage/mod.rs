//! CV storage — an opaque key-to-bytes store behind a trait so the pipeline
//! does not care where documents live. Local disk by default; S3/MinIO in
//! deployed environments.

pub mod extract;
pub mod local;
pub mod s3;

use async_trait::async_trait;
use bytes::Bytes;

use crate::errors::AppError;

#[async_trait]
pub trait CvStore: Send + Sync {
    /// Stores the document under `key`, replacing any previous content.
    async fn put(&self, key: &str, bytes: Bytes) -> Result<(), AppError>;

    /// Fetches the document stored under `key`.
    async fn get(&self, key: &str) -> Result<Bytes, AppError>;
}
