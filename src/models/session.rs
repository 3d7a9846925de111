use chrono::{DateTime, Local};
use serde::Serialize;

/// The device's current login session. The `session` table enforces a
/// single row, so at most one marker is current at a time.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub marker: String,
    pub user_id: String,
    pub expires_at: String, // RFC3339
    pub created_at: String, // RFC3339
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Local>) -> bool {
        match DateTime::parse_from_rfc3339(&self.expires_at) {
            Ok(exp) => exp < now,
            // unparsable expiry counts as expired, not as valid forever
            Err(_) => true,
        }
    }
}
