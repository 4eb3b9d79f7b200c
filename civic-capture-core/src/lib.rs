//! # civic-capture-core
//!
//! Evidence capture and submission core for civic complaints.
//!
//! Owns the camera and microphone for the duration of a capture, turns what
//! they produce into confirmed artifacts, resolves where the problem is, and
//! submits the whole complaint through storage and persistence collaborators.
//! Platform backends implement `DeviceBackend`, `PositionSource`, `Geocoder`,
//! `ObjectStore` and `ComplaintStore`; everything here is runtime-agnostic
//! apart from `tokio::time`.
//!
//! ## Architecture
//!
//! ```text
//! civic-capture-core (this crate)
//! ├── traits/       ← DeviceBackend, CaptureSession, CaptureDelegate, PositionSource, ObjectStore, ...
//! ├── models/       ← errors, session/device state, artifacts, complaint draft and row, configs
//! ├── device/       ← CaptureDevice (exclusive ownership of one backend stream)
//! ├── processing/   ← still-frame JPEG encoding, recorded chunk buffer
//! ├── session/      ← CameraSession, RecorderSession
//! ├── location/     ← LocationProvider (position + best-effort reverse geocoding)
//! └── submission/   ← SubmissionCoordinator, object keys
//! ```

pub mod device;
pub mod location;
pub mod models;
pub mod processing;
pub mod session;
pub mod submission;
pub mod traits;

#[cfg(test)]
mod testing;

// Re-export key types at crate root for convenience.
pub use device::capture_device::CaptureDevice;
pub use location::provider::LocationProvider;
pub use models::artifact::{ArtifactInfo, CaptureArtifact, MediaKind};
pub use models::complaint::{
    Category, ComplaintDraft, ComplaintId, ComplaintRow, ComplaintStatus, Priority, NO_LOCATION_LABEL,
};
pub use models::config::{
    AudioConstraints, CameraConfig, FacingMode, LocationConfig, RecorderConfig, SubmissionConfig, VideoConstraints,
};
pub use models::error::{
    DeviceError, FailedUpload, InsertError, LocationError, SessionError, SubmissionError, UploadError,
    ValidationError,
};
pub use models::location::{LocationResult, Position};
pub use models::state::{DeviceStatus, SessionState};
pub use processing::chunk_buffer::{BufferedAudioStream, ChunkSink};
pub use processing::still_encoder::RawFrame;
pub use session::camera::CameraSession;
pub use session::recorder::{format_duration, RecorderSession};
pub use submission::coordinator::SubmissionCoordinator;
pub use traits::capture_delegate::CaptureDelegate;
pub use traits::capture_provider::{AudioStream, DeviceBackend, DeviceInfo, StreamHandle, VideoStream};
pub use traits::capture_session::CaptureSession;
pub use traits::geolocation::{Geocoder, PositionSource};
pub use traits::storage::{ComplaintStore, ObjectStore};
