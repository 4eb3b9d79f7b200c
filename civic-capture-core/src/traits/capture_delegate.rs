use std::time::Duration;

use crate::models::artifact::MediaKind;
use crate::models::error::SessionError;
use crate::models::state::SessionState;

/// Event delegate for capture session notifications.
///
/// The recorder's elapsed ticks arrive from a runtime task, not the caller's task.
/// Implementations should marshal to the UI thread if needed.
pub trait CaptureDelegate: Send + Sync {
    /// Called when a session changes state.
    fn on_state_changed(&self, kind: MediaKind, state: SessionState);

    /// Called on every recorder tick with the total elapsed recording time.
    fn on_elapsed(&self, _elapsed: Duration) {}

    /// Called when an operation fails. The session is left in a retryable state.
    fn on_error(&self, kind: MediaKind, error: &SessionError);
}
