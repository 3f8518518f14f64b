//! Storage-bucket client for uploaded practice photos.

use async_trait::async_trait;
use bytes::Bytes;

use crate::config::StorageConfig;

/// Storage write failure. Surfaced distinctly from provider errors; there
/// is no retry and no cleanup of partial state.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("network error: {0}")]
    Network(String),

    #[error("storage returned {status}: {message}")]
    Http { status: u16, message: String },
}

/// Client contract for the storage backend.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Upload `data` under `path` and return its public URL.
    async fn upload(
        &self,
        path: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<String, UploadError>;
}

/// Production client for a Supabase-style storage REST API.
pub struct BucketStorageClient {
    config: StorageConfig,
    client: reqwest::Client,
}

impl BucketStorageClient {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn object_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.config.url.trim_end_matches('/'),
            self.config.bucket,
            path
        )
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.config.url.trim_end_matches('/'),
            self.config.bucket,
            path
        )
    }
}

#[async_trait]
impl StorageClient for BucketStorageClient {
    async fn upload(
        &self,
        path: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<String, UploadError> {
        let response = self
            .client
            .post(self.object_url(path))
            .header("Authorization", format!("Bearer {}", self.config.service_key))
            .header("Content-Type", content_type)
            .header("Cache-Control", "max-age=3600")
            .body(data)
            .send()
            .await
            .map_err(|e| UploadError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let message = response.text().await.unwrap_or_default();
            return Err(UploadError::Http { status, message });
        }

        Ok(self.public_url(path))
    }
}

/// Mock client for tests — records nothing, returns a deterministic URL.
#[derive(Default)]
pub struct MockStorageClient {
    fail: bool,
}

impl MockStorageClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self { fail: true }
    }
}

#[async_trait]
impl StorageClient for MockStorageClient {
    async fn upload(
        &self,
        path: &str,
        _data: Bytes,
        _content_type: &str,
    ) -> Result<String, UploadError> {
        if self.fail {
            return Err(UploadError::Network("mock storage failure".to_string()));
        }
        Ok(format!("https://storage.test/public/{path}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_bucket_urls() {
        let client = BucketStorageClient::new(StorageConfig {
            url: "https://project.supabase.co/".to_string(),
            service_key: "key".to_string(),
            bucket: "describe-image".to_string(),
        });

        assert_eq!(
            client.object_url("describe-image/1-photo.png"),
            "https://project.supabase.co/storage/v1/object/describe-image/describe-image/1-photo.png"
        );
        assert_eq!(
            client.public_url("describe-image/1-photo.png"),
            "https://project.supabase.co/storage/v1/object/public/describe-image/describe-image/1-photo.png"
        );
    }

    #[tokio::test]
    async fn mock_returns_public_url() {
        let client = MockStorageClient::new();
        let url = client
            .upload("x/photo.png", Bytes::from_static(b"png"), "image/png")
            .await
            .unwrap();
        assert_eq!(url, "https://storage.test/public/x/photo.png");
    }
}
