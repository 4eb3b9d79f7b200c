use crate::models::artifact::{CaptureArtifact, MediaKind};
use crate::models::error::SessionError;
use crate::models::state::{DeviceStatus, SessionState};

/// Operations shared by the camera and recorder sessions.
///
/// The media-specific transitions (`start`, `capture`, `stop`, `retake`,
/// `discard`) are inherent methods on each session.
pub trait CaptureSession: Send {
    fn kind(&self) -> MediaKind;

    /// Current session state.
    fn state(&self) -> SessionState;

    /// The captured artifact. Present iff the state is `Captured`.
    fn pending(&self) -> Option<&CaptureArtifact>;

    fn device_status(&self) -> DeviceStatus;

    /// Hand the pending artifact to the caller. Transitions: captured → confirmed.
    ///
    /// `Confirmed` is terminal; build a fresh session for another capture.
    fn confirm(&mut self) -> Result<CaptureArtifact, SessionError>;

    /// Cancel from any state: release the device and drop the pending artifact.
    /// Transitions: live/captured → idle. No-op when idle or confirmed.
    fn close(&mut self);
}
