use std::time::Duration;

/// Which way the camera should face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacingMode {
    /// Front camera.
    User,
    /// Rear camera.
    Environment,
}

/// Constraints requested when opening a camera.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoConstraints {
    pub ideal_width: u32,
    pub ideal_height: u32,
    pub facing: FacingMode,
    /// Specific camera device ID, or None for the platform default.
    pub device_id: Option<String>,
}

impl Default for VideoConstraints {
    fn default() -> Self {
        Self {
            ideal_width: 1280,
            ideal_height: 720,
            facing: FacingMode::Environment,
            device_id: None,
        }
    }
}

/// Constraints requested when opening a microphone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioConstraints {
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
    /// Specific microphone device ID, or None for the platform default.
    pub device_id: Option<String>,
}

impl Default for AudioConstraints {
    fn default() -> Self {
        Self {
            echo_cancellation: true,
            noise_suppression: true,
            device_id: None,
        }
    }
}

/// Configuration for a [`CameraSession`](crate::CameraSession).
#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub constraints: VideoConstraints,

    /// JPEG quality, 1–100 (default: 80).
    pub jpeg_quality: u8,

    /// Still frames are scaled down to fit inside this box (default: 1280×720).
    pub max_width: u32,
    pub max_height: u32,

    /// Upper bound on device acquisition (default: 5 s).
    pub acquire_timeout: Duration,
}

impl CameraConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(format!("jpeg quality out of range: {}", self.jpeg_quality));
        }
        if self.max_width == 0 || self.max_height == 0 {
            return Err("still size cap must be non-zero".into());
        }
        if self.acquire_timeout.is_zero() {
            return Err("acquire timeout must be positive".into());
        }
        Ok(())
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            constraints: VideoConstraints::default(),
            jpeg_quality: 80,
            max_width: 1280,
            max_height: 720,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Configuration for a [`RecorderSession`](crate::RecorderSession).
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    pub constraints: AudioConstraints,

    /// MIME type stamped on finished clips (default: `audio/webm`).
    pub mime_type: String,

    /// Granularity of the elapsed counter (default: 1 s).
    pub tick: Duration,

    /// Upper bound on device acquisition (default: 5 s).
    pub acquire_timeout: Duration,
}

impl RecorderConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.mime_type.is_empty() {
            return Err("mime type must not be empty".into());
        }
        if self.tick.is_zero() {
            return Err("tick must be positive".into());
        }
        if self.acquire_timeout.is_zero() {
            return Err("acquire timeout must be positive".into());
        }
        Ok(())
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            constraints: AudioConstraints::default(),
            mime_type: "audio/webm".into(),
            tick: Duration::from_secs(1),
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Configuration for a [`LocationProvider`](crate::LocationProvider).
#[derive(Debug, Clone)]
pub struct LocationConfig {
    /// Upper bound on a single position fix (default: 10 s).
    pub position_timeout: Duration,

    /// Upper bound on reverse geocoding (default: 5 s).
    pub geocode_timeout: Duration,

    /// Ask the platform for a GPS-grade fix (default: true).
    pub high_accuracy: bool,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            position_timeout: Duration::from_secs(10),
            geocode_timeout: Duration::from_secs(5),
            high_accuracy: true,
        }
    }
}

/// Configuration for a [`SubmissionCoordinator`](crate::SubmissionCoordinator).
#[derive(Debug, Clone)]
pub struct SubmissionConfig {
    /// Storage bucket receiving both images and voice notes.
    pub bucket: String,

    /// Per-upload bound, None = wait for the storage client's own timeout.
    pub upload_timeout: Option<Duration>,

    /// Bound on the row insert, None = wait for the client's own timeout.
    pub insert_timeout: Option<Duration>,
}

impl SubmissionConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.bucket.trim().is_empty() {
            return Err("bucket must not be empty".into());
        }
        Ok(())
    }
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            bucket: "complaint-images".into(),
            upload_timeout: Some(Duration::from_secs(30)),
            insert_timeout: Some(Duration::from_secs(15)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(CameraConfig::default().validate().is_ok());
        assert!(RecorderConfig::default().validate().is_ok());
        assert!(SubmissionConfig::default().validate().is_ok());
    }

    #[test]
    fn camera_defaults_match_capture_policy() {
        let config = CameraConfig::default();
        assert_eq!(config.jpeg_quality, 80);
        assert_eq!((config.max_width, config.max_height), (1280, 720));
        assert_eq!(config.constraints.facing, FacingMode::Environment);
    }

    #[test]
    fn rejects_bad_values() {
        let camera = CameraConfig {
            jpeg_quality: 0,
            ..Default::default()
        };
        assert!(camera.validate().is_err());

        let recorder = RecorderConfig {
            tick: Duration::ZERO,
            ..Default::default()
        };
        assert!(recorder.validate().is_err());

        let submission = SubmissionConfig {
            bucket: " ".into(),
            ..Default::default()
        };
        assert!(submission.validate().is_err());
    }
}
