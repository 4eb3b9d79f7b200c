use std::sync::Arc;

use crate::device::capture_device::CaptureDevice;
use crate::models::artifact::{CaptureArtifact, MediaKind};
use crate::models::config::{CameraConfig, VideoConstraints};
use crate::models::error::SessionError;
use crate::models::state::{DeviceStatus, SessionState};
use crate::processing::still_encoder::encode_still;
use crate::traits::capture_delegate::CaptureDelegate;
use crate::traits::capture_provider::{DeviceBackend, VideoStream};
use crate::traits::capture_session::CaptureSession;

/// Photo capture session over one camera.
///
/// ```text
/// idle --start--> live --capture--> captured --confirm--> confirmed
///                  ↑                    │
///                  └──────retake────────┘
/// live/captured --close--> idle
/// ```
///
/// The camera is open only while `live`: taking a still releases it.
pub struct CameraSession<B>
where
    B: DeviceBackend<Constraints = VideoConstraints>,
    B::Stream: VideoStream,
{
    device: CaptureDevice<B>,
    config: CameraConfig,
    state: SessionState,
    pending: Option<CaptureArtifact>,
    delegate: Option<Arc<dyn CaptureDelegate>>,
}

impl<B> CameraSession<B>
where
    B: DeviceBackend<Constraints = VideoConstraints>,
    B::Stream: VideoStream,
{
    pub fn new(backend: B, config: CameraConfig) -> Result<Self, SessionError> {
        config.validate().map_err(SessionError::ConfigurationFailed)?;
        Ok(Self {
            device: CaptureDevice::new(backend),
            config,
            state: SessionState::Idle,
            pending: None,
            delegate: None,
        })
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn CaptureDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn device(&self) -> &CaptureDevice<B> {
        &self.device
    }

    /// Open the camera. Transitions: idle → live.
    ///
    /// On a device error the session stays idle and can be started again.
    pub async fn start(&mut self) -> Result<(), SessionError> {
        if !self.state.is_idle() {
            return Err(self.invalid("start"));
        }

        let limit = self.config.acquire_timeout;
        if let Err(e) = self.device.acquire_within(&self.config.constraints, limit).await {
            self.device.release();
            return Err(self.report(e.into()));
        }

        if let Some(stream) = self.device.stream_mut() {
            let (width, height) = stream.native_resolution();
            log::debug!("Camera live at {}x{}", width, height);
        }
        self.set_state(SessionState::Live);
        Ok(())
    }

    /// Take a still from the live feed. Transitions: live → captured.
    ///
    /// Returns `Ok(None)` and stays live when the feed has no frame yet.
    pub fn capture(&mut self) -> Result<Option<&CaptureArtifact>, SessionError> {
        if !self.state.is_live() {
            return Err(self.invalid("capture"));
        }

        let Some(frame) = self.device.stream_mut().and_then(|s| s.grab_frame()) else {
            log::debug!("No camera frame available yet");
            return Ok(None);
        };

        let artifact = match encode_still(frame, &self.config) {
            Ok(artifact) => artifact,
            Err(e) => return Err(self.report(SessionError::Encoding(e))),
        };

        self.device.release();
        log::info!(
            "Captured still {} ({} bytes)",
            artifact.info().id,
            artifact.bytes().len()
        );
        self.pending = Some(artifact);
        self.set_state(SessionState::Captured);
        Ok(self.pending.as_ref())
    }

    /// Discard the still and reopen the camera. Transitions: captured → live.
    ///
    /// If the camera cannot be reopened the session falls back to idle.
    pub async fn retake(&mut self) -> Result<(), SessionError> {
        if !self.state.is_captured() {
            return Err(self.invalid("retake"));
        }

        self.pending = None;
        self.set_state(SessionState::Idle);
        self.start().await
    }

    fn set_state(&mut self, state: SessionState) {
        self.state = state;
        if let Some(ref delegate) = self.delegate {
            delegate.on_state_changed(MediaKind::Image, state);
        }
    }

    fn invalid(&self, operation: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            state: self.state,
            operation,
        }
    }

    fn report(&self, error: SessionError) -> SessionError {
        log::warn!("Camera session error: {}", error);
        if let Some(ref delegate) = self.delegate {
            delegate.on_error(MediaKind::Image, &error);
        }
        error
    }
}

impl<B> CaptureSession for CameraSession<B>
where
    B: DeviceBackend<Constraints = VideoConstraints>,
    B::Stream: VideoStream,
{
    fn kind(&self) -> MediaKind {
        MediaKind::Image
    }

    fn state(&self) -> SessionState {
        self.state
    }

    fn pending(&self) -> Option<&CaptureArtifact> {
        self.pending.as_ref()
    }

    fn device_status(&self) -> DeviceStatus {
        self.device.status()
    }

    fn confirm(&mut self) -> Result<CaptureArtifact, SessionError> {
        if !self.state.is_captured() {
            return Err(self.invalid("confirm"));
        }
        let Some(artifact) = self.pending.take() else {
            return Err(self.invalid("confirm"));
        };
        self.device.release();
        self.set_state(SessionState::Confirmed);
        Ok(artifact)
    }

    fn close(&mut self) {
        self.device.release();
        if matches!(self.state, SessionState::Live | SessionState::Captured) {
            self.pending = None;
            self.set_state(SessionState::Idle);
        }
    }
}
