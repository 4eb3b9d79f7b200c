//! Complaint row inserts through the table REST API.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use civic_capture_core::models::complaint::{ComplaintId, ComplaintRow};
use civic_capture_core::models::error::InsertError;
use civic_capture_core::traits::storage::ComplaintStore;

use crate::config::{ConfigError, RemoteConfig};

const COMPLAINTS_PATH: &str = "rest/v1/complaints";

/// [`ComplaintStore`] backed by `POST {base}/rest/v1/complaints`.
pub struct RestComplaintStore {
    client: reqwest::Client,
    config: RemoteConfig,
}

impl RestComplaintStore {
    pub fn new(config: RemoteConfig) -> Result<Self, ConfigError> {
        let client = config.build_client()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl ComplaintStore for RestComplaintStore {
    async fn insert_complaint(&self, row: &ComplaintRow) -> Result<ComplaintId, InsertError> {
        let response = self
            .client
            .post(self.config.endpoint(COMPLAINTS_PATH))
            .header("apikey", &self.config.api_key)
            .bearer_auth(self.config.bearer_token())
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await
            .map_err(|e| InsertError::NetworkFailure(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| InsertError::NetworkFailure(e.to_string()))?;

        if !status.is_success() {
            return Err(classify_insert_failure(status, &body));
        }
        parse_inserted_id(&body)
    }
}

/// Maps a non-success insert response to an [`InsertError`].
pub fn classify_insert_failure(status: StatusCode, body: &str) -> InsertError {
    let detail = format!("HTTP {}: {}", status.as_u16(), body.trim());
    if status.is_client_error() && status != StatusCode::REQUEST_TIMEOUT {
        InsertError::Rejected(detail)
    } else if status.is_server_error() || status == StatusCode::REQUEST_TIMEOUT {
        InsertError::NetworkFailure(detail)
    } else {
        InsertError::Unknown(detail)
    }
}

/// Extracts the new row's `id` from a `return=representation` body.
///
/// The body is normally a one-element array; a bare object is accepted too.
/// Numeric ids are rendered as strings.
pub fn parse_inserted_id(body: &str) -> Result<ComplaintId, InsertError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| InsertError::Unknown(format!("unreadable insert response: {}", e)))?;

    let row = match &value {
        Value::Array(rows) => rows.first(),
        Value::Object(_) => Some(&value),
        _ => None,
    };

    match row.and_then(|r| r.get("id")) {
        Some(Value::String(id)) => Ok(ComplaintId(id.clone())),
        Some(Value::Number(id)) => Ok(ComplaintId(id.to_string())),
        _ => Err(InsertError::Unknown("insert response carried no id".into())),
    }
}
