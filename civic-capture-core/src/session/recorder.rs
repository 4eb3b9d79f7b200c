use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

use crate::device::capture_device::CaptureDevice;
use crate::models::artifact::{CaptureArtifact, MediaKind};
use crate::models::config::{AudioConstraints, RecorderConfig};
use crate::models::error::SessionError;
use crate::models::state::{DeviceStatus, SessionState};
use crate::traits::capture_delegate::CaptureDelegate;
use crate::traits::capture_provider::{AudioStream, DeviceBackend, StreamHandle};
use crate::traits::capture_session::CaptureSession;

/// Tick counter shared with the timer task. `running` is flipped under the
/// same lock that increments `ticks`, so no tick lands after stop.
#[derive(Debug, Default)]
struct TickState {
    running: bool,
    ticks: u64,
}

/// Voice note session over one microphone.
///
/// ```text
/// idle --start--> live --stop--> captured --confirm--> confirmed
///                                   │
///                                   └--discard--> idle
/// live/captured --close--> idle
/// ```
///
/// The elapsed counter advances in whole ticks while live and freezes on stop.
pub struct RecorderSession<B>
where
    B: DeviceBackend<Constraints = AudioConstraints>,
    B::Stream: AudioStream,
{
    device: CaptureDevice<B>,
    config: RecorderConfig,
    state: SessionState,
    pending: Option<CaptureArtifact>,
    delegate: Option<Arc<dyn CaptureDelegate>>,
    ticks: Arc<Mutex<TickState>>,
    timer_handle: Option<JoinHandle<()>>,
}

impl<B> RecorderSession<B>
where
    B: DeviceBackend<Constraints = AudioConstraints>,
    B::Stream: AudioStream,
{
    pub fn new(backend: B, config: RecorderConfig) -> Result<Self, SessionError> {
        config.validate().map_err(SessionError::ConfigurationFailed)?;
        Ok(Self {
            device: CaptureDevice::new(backend),
            config,
            state: SessionState::Idle,
            pending: None,
            delegate: None,
            ticks: Arc::new(Mutex::new(TickState::default())),
            timer_handle: None,
        })
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn CaptureDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn device(&self) -> &CaptureDevice<B> {
        &self.device
    }

    /// Recording time counted so far, in whole ticks.
    pub fn elapsed(&self) -> Duration {
        self.config.tick * self.ticks.lock().ticks as u32
    }

    /// Open the microphone and start recording. Transitions: idle → live.
    ///
    /// Calling it while already live is a no-op.
    pub async fn start(&mut self) -> Result<SessionState, SessionError> {
        match self.state {
            SessionState::Idle => {}
            SessionState::Live => return Ok(self.state),
            _ => return Err(self.invalid("start")),
        }

        let limit = self.config.acquire_timeout;
        if let Err(e) = self.device.acquire_within(&self.config.constraints, limit).await {
            self.device.release();
            return Err(self.report(e.into()));
        }

        *self.ticks.lock() = TickState {
            running: true,
            ticks: 0,
        };
        self.start_duration_timer();
        self.set_state(SessionState::Live);
        Ok(self.state)
    }

    /// Stop recording and finalize the clip. Transitions: live → captured.
    ///
    /// A clip with no buffered audio is still produced; rejecting degenerate
    /// clips is up to the caller.
    pub fn stop(&mut self) -> Result<&CaptureArtifact, SessionError> {
        if !self.state.is_live() {
            return Err(self.invalid("stop"));
        }

        let ticks = self.stop_duration_timer();
        // Stop before draining: recorders flush their last chunk on stop.
        let bytes = match self.device.stream_mut() {
            Some(stream) => {
                stream.stop();
                stream.take_buffered()
            }
            None => Vec::new(),
        };
        self.device.release();

        let duration_ms = (self.config.tick * ticks as u32).as_millis() as u64;
        let artifact = CaptureArtifact::audio_clip(bytes, self.config.mime_type.clone(), duration_ms);
        log::info!(
            "Recorded clip {} ({} ms, {} bytes)",
            artifact.info().id,
            duration_ms,
            artifact.bytes().len()
        );

        self.set_state(SessionState::Captured);
        Ok(&*self.pending.insert(artifact))
    }

    /// Drop the clip and reset the counter. Transitions: captured → idle.
    pub fn discard(&mut self) -> Result<(), SessionError> {
        if !self.state.is_captured() {
            return Err(self.invalid("discard"));
        }
        self.pending = None;
        self.ticks.lock().ticks = 0;
        self.set_state(SessionState::Idle);
        Ok(())
    }

    fn start_duration_timer(&mut self) {
        let ticks = Arc::clone(&self.ticks);
        let delegate = self.delegate.clone();
        let tick = self.config.tick;

        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + tick, tick);
            loop {
                interval.tick().await;

                let count = {
                    let mut t = ticks.lock();
                    if !t.running {
                        break;
                    }
                    t.ticks += 1;
                    t.ticks
                };

                if let Some(ref d) = delegate {
                    d.on_elapsed(tick * count as u32);
                }
            }
        });

        self.timer_handle = Some(handle);
    }

    /// Freeze the counter and return the final tick count.
    fn stop_duration_timer(&mut self) -> u64 {
        let ticks = {
            let mut t = self.ticks.lock();
            t.running = false;
            t.ticks
        };
        if let Some(handle) = self.timer_handle.take() {
            handle.abort();
        }
        ticks
    }

    fn set_state(&mut self, state: SessionState) {
        self.state = state;
        if let Some(ref delegate) = self.delegate {
            delegate.on_state_changed(MediaKind::Voice, state);
        }
    }

    fn invalid(&self, operation: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            state: self.state,
            operation,
        }
    }

    fn report(&self, error: SessionError) -> SessionError {
        log::warn!("Recorder session error: {}", error);
        if let Some(ref delegate) = self.delegate {
            delegate.on_error(MediaKind::Voice, &error);
        }
        error
    }
}

impl<B> CaptureSession for RecorderSession<B>
where
    B: DeviceBackend<Constraints = AudioConstraints>,
    B::Stream: AudioStream,
{
    fn kind(&self) -> MediaKind {
        MediaKind::Voice
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
        self.set_state(SessionState::Confirmed);
        Ok(artifact)
    }

    fn close(&mut self) {
        self.stop_duration_timer();
        self.device.release();
        if matches!(self.state, SessionState::Live | SessionState::Captured) {
            self.pending = None;
            self.ticks.lock().ticks = 0;
            self.set_state(SessionState::Idle);
        }
    }
}

impl<B> Drop for RecorderSession<B>
where
    B: DeviceBackend<Constraints = AudioConstraints>,
    B::Stream: AudioStream,
{
    fn drop(&mut self) {
        self.stop_duration_timer();
    }
}

/// Formats a recording duration as `m:ss`.
pub fn format_duration(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
