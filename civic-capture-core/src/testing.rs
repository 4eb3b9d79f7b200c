//! In-memory device backends for unit tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::models::artifact::MediaKind;
use crate::models::config::{AudioConstraints, VideoConstraints};
use crate::models::error::{DeviceError, SessionError};
use crate::models::state::SessionState;
use crate::processing::chunk_buffer::{BufferedAudioStream, ChunkSink};
use crate::processing::still_encoder::RawFrame;
use crate::traits::capture_delegate::CaptureDelegate;
use crate::traits::capture_provider::{DeviceBackend, DeviceInfo, StreamHandle, VideoStream};

/// Counts hardware opens and stops across every stream of one backend.
#[derive(Debug, Default)]
pub struct Probe {
    pub open_now: usize,
    pub max_open: usize,
    pub opens: usize,
    pub stops: usize,
}

pub type SharedProbe = Arc<Mutex<Probe>>;

fn record_open(probe: &SharedProbe) {
    let mut p = probe.lock();
    p.open_now += 1;
    p.opens += 1;
    p.max_open = p.max_open.max(p.open_now);
}

fn record_stop(probe: &SharedProbe) {
    let mut p = probe.lock();
    p.open_now -= 1;
    p.stops += 1;
}

pub struct FakeCamera {
    pub probe: SharedProbe,
    fail_next: Mutex<Option<DeviceError>>,
    open_delay: Option<Duration>,
    resolution: (u32, u32),
    has_frames: bool,
}

impl FakeCamera {
    pub fn new() -> Self {
        Self {
            probe: SharedProbe::default(),
            fail_next: Mutex::new(None),
            open_delay: None,
            resolution: (64, 36),
            has_frames: true,
        }
    }

    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.resolution = (width, height);
        self
    }

    pub fn without_frames(mut self) -> Self {
        self.has_frames = false;
        self
    }

    pub fn with_open_delay(mut self, delay: Duration) -> Self {
        self.open_delay = Some(delay);
        self
    }

    pub fn fail_next(&self, error: DeviceError) {
        *self.fail_next.lock() = Some(error);
    }
}

pub struct FakeVideoStream {
    probe: SharedProbe,
    resolution: (u32, u32),
    has_frames: bool,
    stopped: bool,
}

impl StreamHandle for FakeVideoStream {
    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            record_stop(&self.probe);
        }
    }
}

impl VideoStream for FakeVideoStream {
    fn native_resolution(&self) -> (u32, u32) {
        self.resolution
    }

    fn grab_frame(&mut self) -> Option<RawFrame> {
        if !self.has_frames || self.stopped {
            return None;
        }
        let (width, height) = self.resolution;
        Some(RawFrame {
            width,
            height,
            rgba: [10u8, 120, 200, 255].repeat((width * height) as usize),
        })
    }
}

impl Drop for FakeVideoStream {
    fn drop(&mut self) {
        self.stop();
    }
}

#[async_trait]
impl DeviceBackend for FakeCamera {
    type Constraints = VideoConstraints;
    type Stream = FakeVideoStream;

    fn kind(&self) -> MediaKind {
        MediaKind::Image
    }

    fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            id: "fake-camera".into(),
            name: "Fake Camera".into(),
            kind: MediaKind::Image,
            is_default: true,
        }
    }

    async fn open(&self, _constraints: &VideoConstraints) -> Result<FakeVideoStream, DeviceError> {
        if let Some(delay) = self.open_delay {
            tokio::time::sleep(delay).await;
        }
        let failure = self.fail_next.lock().take();
        if let Some(error) = failure {
            return Err(error);
        }
        record_open(&self.probe);
        Ok(FakeVideoStream {
            probe: Arc::clone(&self.probe),
            resolution: self.resolution,
            has_frames: self.has_frames,
            stopped: false,
        })
    }
}

pub struct FakeMicrophone {
    pub probe: SharedProbe,
    fail_next: Mutex<Option<DeviceError>>,
    sink: Arc<Mutex<Option<ChunkSink>>>,
    final_chunk: Option<Vec<u8>>,
}

impl FakeMicrophone {
    pub fn new() -> Self {
        Self {
            probe: SharedProbe::default(),
            fail_next: Mutex::new(None),
            sink: Arc::new(Mutex::new(None)),
            final_chunk: None,
        }
    }

    /// Deliver `chunk` from inside the stop hook, the way a recorder flushes on stop.
    pub fn with_final_chunk(mut self, chunk: &[u8]) -> Self {
        self.final_chunk = Some(chunk.to_vec());
        self
    }

    pub fn fail_next(&self, error: DeviceError) {
        *self.fail_next.lock() = Some(error);
    }

    /// Deliver a chunk to the most recently opened stream.
    pub fn feed(&self, chunk: &[u8]) -> bool {
        match self.sink.lock().as_ref() {
            Some(sink) => sink.push(chunk),
            None => false,
        }
    }
}

#[async_trait]
impl DeviceBackend for FakeMicrophone {
    type Constraints = AudioConstraints;
    type Stream = BufferedAudioStream;

    fn kind(&self) -> MediaKind {
        MediaKind::Voice
    }

    fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            id: "fake-mic".into(),
            name: "Fake Microphone".into(),
            kind: MediaKind::Voice,
            is_default: true,
        }
    }

    async fn open(&self, _constraints: &AudioConstraints) -> Result<BufferedAudioStream, DeviceError> {
        let failure = self.fail_next.lock().take();
        if let Some(error) = failure {
            return Err(error);
        }
        record_open(&self.probe);
        let probe = Arc::clone(&self.probe);
        let slot = Arc::clone(&self.sink);
        let final_chunk = self.final_chunk.clone();
        let (stream, sink) = BufferedAudioStream::new(move || {
            if let (Some(chunk), Some(sink)) = (final_chunk, slot.lock().as_ref()) {
                sink.push(&chunk);
            }
            record_stop(&probe);
        });
        *self.sink.lock() = Some(sink);
        Ok(stream)
    }
}

/// Delegate that records every notification.
#[derive(Default)]
pub struct RecordingDelegate {
    pub states: Mutex<Vec<(MediaKind, SessionState)>>,
    pub errors: Mutex<Vec<SessionError>>,
    pub elapsed: Mutex<Vec<Duration>>,
}

impl CaptureDelegate for RecordingDelegate {
    fn on_state_changed(&self, kind: MediaKind, state: SessionState) {
        self.states.lock().push((kind, state));
    }

    fn on_elapsed(&self, elapsed: Duration) {
        self.elapsed.lock().push(elapsed);
    }

    fn on_error(&self, _kind: MediaKind, error: &SessionError) {
        self.errors.lock().push(error.clone());
    }
}
