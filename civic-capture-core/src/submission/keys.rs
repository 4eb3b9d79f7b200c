use crate::models::artifact::{next_stamp_ms, MediaKind};

/// Storage path for one uploaded artifact: `{user_id}/{kind}_{stamp_ms}.{ext}`.
pub fn object_key(user_id: &str, kind: MediaKind, stamp_ms: i64) -> String {
    format!("{}/{}_{}.{}", user_id, kind.as_str(), stamp_ms, kind.extension())
}

/// Key for a new upload attempt. Never returns the same key twice in one process.
pub fn fresh_object_key(user_id: &str, kind: MediaKind) -> String {
    object_key(user_id, kind, next_stamp_ms())
}
