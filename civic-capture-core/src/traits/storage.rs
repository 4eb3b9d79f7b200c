use async_trait::async_trait;

use crate::models::complaint::{ComplaintId, ComplaintRow};
use crate::models::error::{InsertError, UploadError};

/// Object storage collaborator.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `key` in `bucket`, returning the stored key.
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<String, UploadError>;
}

/// Persistence collaborator owning the complaints table.
#[async_trait]
pub trait ComplaintStore: Send + Sync {
    /// Insert one complaint row. This is the single commit point of a submission.
    async fn insert_complaint(&self, row: &ComplaintRow) -> Result<ComplaintId, InsertError>;
}
