use async_trait::async_trait;

use crate::models::artifact::MediaKind;
use crate::models::error::DeviceError;
use crate::processing::still_encoder::RawFrame;

/// Information about the hardware behind a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub id: String,
    pub name: String,
    pub kind: MediaKind,
    pub is_default: bool,
}

/// A live hardware stream returned by [`DeviceBackend::open`].
pub trait StreamHandle: Send + 'static {
    /// Stop every underlying track and free the hardware. Must be idempotent.
    fn stop(&mut self);
}

/// A live camera feed.
pub trait VideoStream: StreamHandle {
    /// Resolution the camera actually negotiated.
    fn native_resolution(&self) -> (u32, u32);

    /// Latest RGBA frame, or `None` if the feed has not produced one yet.
    fn grab_frame(&mut self) -> Option<RawFrame>;
}

/// A live microphone recording.
pub trait AudioStream: StreamHandle {
    /// Drain the encoded audio recorded so far.
    fn take_buffered(&mut self) -> Vec<u8>;
}

/// Interface for platform-specific capture hardware (camera sensor or microphone).
///
/// `open` must fail fast with [`DeviceError::PermissionDenied`] or
/// [`DeviceError::DeviceUnavailable`] rather than hang, and must not retry.
#[async_trait]
pub trait DeviceBackend: Send + Sync + 'static {
    type Constraints: Send + Sync;
    type Stream: StreamHandle;

    fn kind(&self) -> MediaKind;

    fn device_info(&self) -> DeviceInfo;

    async fn open(&self, constraints: &Self::Constraints) -> Result<Self::Stream, DeviceError>;
}
