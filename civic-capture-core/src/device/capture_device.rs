use std::time::Duration;

use crate::models::error::DeviceError;
use crate::models::state::DeviceStatus;
use crate::traits::capture_provider::{DeviceBackend, DeviceInfo, StreamHandle};

/// Exclusive owner of one capture device.
///
/// Holds at most one open stream. `acquire` takes `&mut self`, so two
/// overlapping acquisitions on the same instance cannot be expressed; calling
/// it again while open keeps the existing stream. The stream is stopped by
/// [`release`](Self::release) and, failing that, when the device is dropped.
pub struct CaptureDevice<B: DeviceBackend> {
    backend: B,
    status: DeviceStatus,
    stream: Option<B::Stream>,
}

impl<B: DeviceBackend> CaptureDevice<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            status: DeviceStatus::Closed,
            stream: None,
        }
    }

    pub fn status(&self) -> DeviceStatus {
        self.status
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    pub fn info(&self) -> DeviceInfo {
        self.backend.device_info()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The live stream, present iff the device is open.
    pub fn stream_mut(&mut self) -> Option<&mut B::Stream> {
        self.stream.as_mut()
    }

    /// Open the device. Transitions: closed/error → opening → open/error.
    pub async fn acquire(&mut self, constraints: &B::Constraints) -> Result<(), DeviceError> {
        if self.stream.is_some() {
            log::debug!("{} already open, keeping existing stream", self.backend.kind());
            return Ok(());
        }

        self.status = DeviceStatus::Opening;
        match self.backend.open(constraints).await {
            Ok(stream) => {
                self.stream = Some(stream);
                self.status = DeviceStatus::Open;
                let info = self.info();
                log::info!(
                    "Acquired {} device {} ({}{})",
                    self.backend.kind(),
                    info.name,
                    info.id,
                    if info.is_default { ", default" } else { "" }
                );
                Ok(())
            }
            Err(e) => {
                self.status = DeviceStatus::Error;
                log::warn!("Failed to acquire {} device: {}", self.backend.kind(), e);
                Err(e)
            }
        }
    }

    /// [`acquire`](Self::acquire) bounded by `limit`. On timeout the pending open is
    /// dropped and the device ends in `Error` with no stream.
    pub async fn acquire_within(
        &mut self,
        constraints: &B::Constraints,
        limit: Duration,
    ) -> Result<(), DeviceError> {
        match tokio::time::timeout(limit, self.acquire(constraints)).await {
            Ok(result) => result,
            Err(_) => {
                self.status = DeviceStatus::Error;
                log::warn!("Timed out acquiring {} device after {:?}", self.backend.kind(), limit);
                Err(DeviceError::Timeout)
            }
        }
    }

    /// Stop and free the stream. Safe from any state; repeated calls are no-ops.
    pub fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            log::info!("Released {} device {}", self.backend.kind(), self.info().name);
        }
        self.status = DeviceStatus::Closed;
    }
}

impl<B: DeviceBackend> Drop for CaptureDevice<B> {
    fn drop(&mut self) {
        self.release();
    }
}
