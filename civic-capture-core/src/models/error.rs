use thiserror::Error;

use super::artifact::MediaKind;
use super::state::SessionState;

/// Errors raised while acquiring or driving a capture device.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("device not available")]
    DeviceUnavailable,

    #[error("timed out waiting for the device")]
    Timeout,

    #[error("unknown device error: {0}")]
    Unknown(String),
}

/// Errors raised by position queries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("location unavailable")]
    Unavailable,

    #[error("timed out waiting for a position fix")]
    Timeout,

    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(String),
}

/// Errors reported by the object storage collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("network failure: {0}")]
    NetworkFailure(String),

    #[error("storage quota exceeded")]
    QuotaExceeded,

    #[error("unknown upload error: {0}")]
    Unknown(String),
}

/// Errors reported by the persistence collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InsertError {
    #[error("insert rejected: {0}")]
    Rejected(String),

    #[error("network failure: {0}")]
    NetworkFailure(String),

    #[error("unknown insert error: {0}")]
    Unknown(String),
}

/// A required draft field is missing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("missing required field: {field}")]
pub struct ValidationError {
    pub field: &'static str,
}

/// Errors raised by a capture session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("cannot {operation} while {state}")]
    InvalidTransition {
        state: SessionState,
        operation: &'static str,
    },

    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error("encoding failed: {0}")]
    Encoding(String),

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),
}

/// One artifact that could not be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedUpload {
    pub kind: MediaKind,
    pub error: UploadError,
}

/// Errors returned by [`SubmissionCoordinator::submit`](crate::SubmissionCoordinator::submit).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("upload failed for: {}", describe_failures(.0))]
    PartialUploadFailure(Vec<FailedUpload>),

    #[error("failed to save complaint: {0}")]
    PersistenceFailure(InsertError),

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),
}

impl SubmissionError {
    /// Media kinds whose upload failed, in image-then-voice order.
    pub fn failed_kinds(&self) -> Vec<MediaKind> {
        match self {
            Self::PartialUploadFailure(failures) => failures.iter().map(|f| f.kind).collect(),
            _ => Vec::new(),
        }
    }
}

fn describe_failures(failures: &[FailedUpload]) -> String {
    failures
        .iter()
        .map(|f| format!("{} ({})", f.kind, f.error))
        .collect::<Vec<_>>()
        .join(", ")
}
