//! Session identity: opaque marker comparison and marker generation.

use rand::Rng;
use rand::distributions::Alphanumeric;

/// Length of generated session markers.
const MARKER_LEN: usize = 32;

/// Decide whether the login session has changed between two observations.
///
/// Markers are opaque equality-comparable tokens; no decoding, no expiry
/// check here (that is the auth guard's job). An absent `last_seen` seeds
/// the baseline and is NOT treated as a change.
pub fn has_session_changed(last_seen: Option<&str>, current: Option<&str>) -> bool {
    match (last_seen, current) {
        (Some(prev), Some(cur)) => prev != cur,
        _ => false,
    }
}

/// Generate a fresh opaque session marker.
pub fn new_marker() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(MARKER_LEN)
        .map(char::from)
        .collect()
}
