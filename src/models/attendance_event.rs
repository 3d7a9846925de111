use super::{event_kind::EventKind, geo::GeoPoint};
use chrono::Local;
use serde::Serialize;

/// One check-in/check-out attempt, recorded exactly once and immutable
/// afterwards. Rejected attempts are recorded too, with `accepted = false`.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceEvent {
    pub id: i64,
    pub shift_id: i64,
    pub kind: EventKind,
    pub observed: GeoPoint,
    pub distance_meters: f64,
    pub accepted: bool,
    pub created_at: String, // RFC3339
}

impl AttendanceEvent {
    /// Constructor for events produced by the check-in/out commands.
    /// `id = 0` until the row is inserted.
    pub fn new(
        shift_id: i64,
        kind: EventKind,
        observed: GeoPoint,
        distance_meters: f64,
        accepted: bool,
    ) -> Self {
        Self {
            id: 0,
            shift_id,
            kind,
            observed,
            distance_meters,
            accepted,
            created_at: Local::now().to_rfc3339(),
        }
    }
}
