//! Object uploads through the storage REST API.

use async_trait::async_trait;
use reqwest::StatusCode;

use civic_capture_core::models::error::UploadError;
use civic_capture_core::traits::storage::ObjectStore;

use crate::config::{ConfigError, RemoteConfig};

/// [`ObjectStore`] backed by `POST {base}/storage/v1/object/{bucket}/{key}`.
pub struct RestObjectStore {
    client: reqwest::Client,
    config: RemoteConfig,
}

impl RestObjectStore {
    pub fn new(config: RemoteConfig) -> Result<Self, ConfigError> {
        let client = config.build_client()?;
        Ok(Self { client, config })
    }

    pub fn object_url(&self, bucket: &str, key: &str) -> String {
        self.config
            .endpoint(&format!("storage/v1/object/{}/{}", bucket, key.trim_start_matches('/')))
    }
}

#[async_trait]
impl ObjectStore for RestObjectStore {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<String, UploadError> {
        let url = self.object_url(bucket, key);
        log::debug!("Uploading object to {} ({} bytes)", url, bytes.len());

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.config.api_key)
            .bearer_auth(self.config.bearer_token())
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(key.to_string());
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_upload_failure(status, &body))
    }
}

fn transport_error(e: reqwest::Error) -> UploadError {
    UploadError::NetworkFailure(e.to_string())
}

/// Maps a non-success storage response to an [`UploadError`].
pub fn classify_upload_failure(status: StatusCode, body: &str) -> UploadError {
    let lowered = body.to_ascii_lowercase();
    if status == StatusCode::PAYLOAD_TOO_LARGE
        || status == StatusCode::INSUFFICIENT_STORAGE
        || lowered.contains("quota")
    {
        return UploadError::QuotaExceeded;
    }
    match status {
        StatusCode::REQUEST_TIMEOUT
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => UploadError::NetworkFailure(format!("HTTP {}", status.as_u16())),
        _ => UploadError::Unknown(format!("HTTP {}: {}", status.as_u16(), body.trim())),
    }
}
