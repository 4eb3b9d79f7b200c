use std::fmt;

/// Lifecycle of a single capture device.
///
/// ```text
/// closed → opening → open
///             ↓
///           error
/// (any) → closed    via release()
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceStatus {
    Closed,
    Opening,
    Open,
    Error,
}

impl DeviceStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Capture session state machine, shared by the camera and recorder sessions.
///
/// State transitions:
/// ```text
/// idle → live → captured → confirmed
///  ↑      │        │
///  └──────┴────────┘   close / discard
/// captured → live      retake (camera only)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Idle,
    Live,
    Captured,
    Confirmed,
}

impl SessionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live)
    }

    pub fn is_captured(&self) -> bool {
        matches!(self, Self::Captured)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Live => "live",
            Self::Captured => "captured",
            Self::Confirmed => "confirmed",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
