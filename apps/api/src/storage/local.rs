//! Local-disk CV store: one file per key under the configured uploads
//! directory. The default backend for development.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;

use crate::errors::AppError;
use crate::storage::CvStore;

pub struct LocalCvStore {
    root: PathBuf,
}

impl LocalCvStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Keys are opaque but become file names here; strip any path components
    /// so a crafted key cannot escape the uploads directory.
    fn path_for(&self, key: &str) -> PathBuf {
        let file_name = Path::new(key)
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "cv".into());
        self.root.join(file_name)
    }
}

#[async_trait]
impl CvStore for LocalCvStore {
    async fn put(&self, key: &str, bytes: Bytes) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| AppError::Storage(format!("creating upload dir: {e}")))?;

        tokio::fs::write(self.path_for(key), &bytes)
            .await
            .map_err(|e| AppError::Storage(format!("writing CV '{key}': {e}")))
    }

    async fn get(&self, key: &str) -> Result<Bytes, AppError> {
        let data = tokio::fs::read(self.path_for(key))
            .await
            .map_err(|e| AppError::Storage(format!("reading CV '{key}': {e}")))?;
        Ok(Bytes::from(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_then_get_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalCvStore::new(dir.path());

        store
            .put("cv-jean-dupont.txt", Bytes::from_static(b"mon cv"))
            .await
            .unwrap();
        let read = store.get("cv-jean-dupont.txt").await.unwrap();
        assert_eq!(read.as_ref(), b"mon cv");
    }

    #[tokio::test]
    async fn test_put_replaces_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalCvStore::new(dir.path());

        store.put("cv.txt", Bytes::from_static(b"v1")).await.unwrap();
        store.put("cv.txt", Bytes::from_static(b"v2")).await.unwrap();
        assert_eq!(store.get("cv.txt").await.unwrap().as_ref(), b"v2");
    }

    #[tokio::test]
    async fn test_get_missing_key_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalCvStore::new(dir.path());
        assert!(matches!(
            store.get("absent.pdf").await,
            Err(AppError::Storage(_))
        ));
    }

    #[tokio::test]
    async fn test_keys_cannot_escape_the_uploads_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalCvStore::new(dir.path().join("uploads"));

        store
            .put("../../etc/cv.txt", Bytes::from_static(b"x"))
            .await
            .unwrap();
        assert!(dir.path().join("uploads").join("cv.txt").exists());
    }
}
