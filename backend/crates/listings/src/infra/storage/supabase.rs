//! Supabase Storage (REST)
//!
//! Objects go to `POST {base}/storage/v1/object/{bucket}/{key}` and are
//! served from `{base}/storage/v1/object/public/{bucket}/{key}`.

use std::time::Duration;

use async_trait::async_trait;
use platform::secret::SecretString;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

use super::{PhotoStorage, StorageError, key_from_url, object_key};
use crate::domain::photo::PhotoUpload;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct SupabaseStorage {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
    bucket: String,
}

impl SupabaseStorage {
    pub fn new(
        base_url: impl Into<String>,
        api_key: SecretString,
        bucket: impl Into<String>,
    ) -> Result<Self, StorageError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let bucket = bucket.into();
        if base_url.is_empty() || api_key.is_empty() || bucket.is_empty() {
            return Err(StorageError::Config(
                "SUPABASE_URL, SUPABASE_KEY and bucket must be set".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_key,
            bucket,
        })
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}{}", self.public_prefix(), key)
    }

    fn public_prefix(&self) -> String {
        format!("{}/storage/v1/object/public/{}/", self.base_url, self.bucket)
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, key)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key.expose()))
            .header("apikey", self.api_key.expose())
    }

    /// Create the bucket as public if it does not exist yet. Failures are
    /// reported but not fatal: the bucket may have been created by hand.
    pub async fn ensure_bucket(&self) -> Result<(), StorageError> {
        let response = self
            .authorized(
                self.client
                    .post(format!("{}/storage/v1/bucket", self.base_url)),
            )
            .json(&serde_json::json!({
                "id": self.bucket,
                "name": self.bucket,
                "public": true,
            }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(bucket = %self.bucket, "Created storage bucket");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        // Supabase answers 400/409 with "already exists" for existing buckets.
        if status == StatusCode::CONFLICT || body.contains("already exists") {
            tracing::debug!(bucket = %self.bucket, "Storage bucket already exists");
            return Ok(());
        }

        Err(StorageError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl PhotoStorage for SupabaseStorage {
    async fn upload(&self, photo: &PhotoUpload, folder: &str) -> Result<String, StorageError> {
        let key = object_key(folder, &photo.extension());

        let response = self
            .authorized(self.client.post(self.object_url(&key)))
            .header(CONTENT_TYPE, photo.mime_type())
            .header("x-upsert", "false")
            .body(photo.bytes.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(key = %key, size = photo.size(), "Uploaded photo to Supabase");
        Ok(self.public_url(&key))
    }

    async fn delete(&self, url: &str) -> bool {
        let prefix = self.public_prefix();
        let Some(key) = key_from_url(url, &prefix) else {
            return false;
        };

        let result = self
            .authorized(self.client.delete(self.object_url(key)))
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::warn!(key = %key, status = %response.status(), "Failed to delete photo");
                false
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to delete photo");
                false
            }
        }
    }

    fn name(&self) -> &'static str {
        "supabase"
    }
}
