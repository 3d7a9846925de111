//! Time utilities: current instant, RFC3339 storage strings, expiry math.

use chrono::{DateTime, Duration, Local};

/// Current local time. Single call site for "now" so guard checks and
/// recorded timestamps agree within a command invocation.
pub fn now() -> DateTime<Local> {
    Local::now()
}

/// RFC3339 string for storage columns.
pub fn now_rfc3339() -> String {
    now().to_rfc3339()
}

/// Expiry timestamp `minutes` from now, as stored in the session row.
pub fn expiry_rfc3339(minutes: i64) -> String {
    (now() + Duration::minutes(minutes)).to_rfc3339()
}

/// Shorten an RFC3339 storage string for table output (date + HH:MM).
/// Unparsable values pass through untouched.
pub fn short_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
