//! Local filesystem storage for development
//!
//! Files land under `root/{key}`; the API server serves `root` at
//! `public_base_url`.

use std::path::PathBuf;

use async_trait::async_trait;

use super::{PhotoStorage, StorageError, key_from_url, object_key};
use crate::domain::photo::PhotoUpload;

pub struct LocalStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    fn public_prefix(&self) -> String {
        format!("{}/", self.public_base_url)
    }
}

#[async_trait]
impl PhotoStorage for LocalStorage {
    async fn upload(&self, photo: &PhotoUpload, folder: &str) -> Result<String, StorageError> {
        let key = object_key(folder, &photo.extension());
        let path = self.root.join(&key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &photo.bytes).await?;

        tracing::debug!(path = %path.display(), size = photo.size(), "Stored photo locally");
        Ok(format!("{}{}", self.public_prefix(), key))
    }

    async fn delete(&self, url: &str) -> bool {
        let prefix = self.public_prefix();
        let Some(key) = key_from_url(url, &prefix) else {
            return false;
        };

        match tokio::fs::remove_file(self.root.join(key)).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to delete local photo");
                false
            }
        }
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo() -> PhotoUpload {
        PhotoUpload {
            filename: Some("desk.PNG".to_string()),
            content_type: Some("image/png".to_string()),
            bytes: vec![1, 2, 3, 4],
        }
    }

    #[tokio::test]
    async fn test_upload_then_delete() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://localhost:31113/media/");

        let url = storage.upload(&photo(), "listings").await.unwrap();
        assert!(url.starts_with("http://localhost:31113/media/listings/"));
        assert!(url.ends_with(".png"));

        let key = url.strip_prefix("http://localhost:31113/media/").unwrap();
        let stored = tokio::fs::read(dir.path().join(key)).await.unwrap();
        assert_eq!(stored, vec![1, 2, 3, 4]);

        assert!(storage.delete(&url).await);
        assert!(!dir.path().join(key).exists());
        assert!(!storage.delete(&url).await);
    }

    #[tokio::test]
    async fn test_delete_refuses_paths_outside_root() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("media"), "http://localhost/media");

        let outside = dir.path().join("keep.txt");
        tokio::fs::write(&outside, b"keep").await.unwrap();

        assert!(!storage.delete("http://localhost/media/../keep.txt").await);
        assert!(outside.exists());
    }
}
