use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Kind of evidence attached to a complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Voice,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Voice => "voice",
        }
    }

    /// File extension used for uploaded objects of this kind.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Image => "jpg",
            Self::Voice => "webm",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity and integrity data stamped on every artifact when it is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactInfo {
    pub id: String,
    pub captured_at: DateTime<Utc>,
    /// Strictly increasing across the process, see [`next_stamp_ms`].
    pub stamp_ms: i64,
    /// SHA-256 of the payload, lowercase hex.
    pub checksum: String,
}

impl ArtifactInfo {
    pub fn for_payload(bytes: &[u8]) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            captured_at: Utc::now(),
            stamp_ms: next_stamp_ms(),
            checksum: sha256_hex(bytes),
        }
    }
}

/// An immutable captured media payload, ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureArtifact {
    Image {
        bytes: Vec<u8>,
        mime_type: String,
        width: u32,
        height: u32,
        info: ArtifactInfo,
    },
    AudioClip {
        bytes: Vec<u8>,
        mime_type: String,
        duration_ms: u64,
        info: ArtifactInfo,
    },
}

impl CaptureArtifact {
    pub fn image(bytes: Vec<u8>, mime_type: impl Into<String>, width: u32, height: u32) -> Self {
        let info = ArtifactInfo::for_payload(&bytes);
        Self::Image {
            bytes,
            mime_type: mime_type.into(),
            width,
            height,
            info,
        }
    }

    pub fn audio_clip(bytes: Vec<u8>, mime_type: impl Into<String>, duration_ms: u64) -> Self {
        let info = ArtifactInfo::for_payload(&bytes);
        Self::AudioClip {
            bytes,
            mime_type: mime_type.into(),
            duration_ms,
            info,
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            Self::Image { .. } => MediaKind::Image,
            Self::AudioClip { .. } => MediaKind::Voice,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Image { bytes, .. } | Self::AudioClip { bytes, .. } => bytes,
        }
    }

    pub fn mime_type(&self) -> &str {
        match self {
            Self::Image { mime_type, .. } | Self::AudioClip { mime_type, .. } => mime_type,
        }
    }

    pub fn info(&self) -> &ArtifactInfo {
        match self {
            Self::Image { info, .. } | Self::AudioClip { info, .. } => info,
        }
    }

    /// Recorded duration for audio clips, `None` for images.
    pub fn duration_ms(&self) -> Option<u64> {
        match self {
            Self::AudioClip { duration_ms, .. } => Some(*duration_ms),
            Self::Image { .. } => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes().is_empty()
    }
}

static LAST_STAMP_MS: AtomicI64 = AtomicI64::new(0);

/// Epoch milliseconds, bumped so that no two calls in one process return the same value.
pub fn next_stamp_ms() -> i64 {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_STAMP_MS.load(Ordering::Acquire);
    loop {
        let next = now.max(last + 1);
        match LAST_STAMP_MS.compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Acquire) {
            Ok(_) => return next,
            Err(actual) => last = actual,
        }
    }
}

pub(crate) fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes).iter().map(|b| format!("{:02x}", b)).collect()
}
