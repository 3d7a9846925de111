//! High-level check-in/check-out logic: evaluate the outlet geofence and
//! record the attempt exactly once.

use crate::core::geofence;
use crate::db::log::ttlog;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::attendance_event::AttendanceEvent;
use crate::models::event_kind::EventKind;
use crate::models::geo::GeoPoint;
use crate::models::shift::Shift;
use rusqlite::Connection;

pub struct CheckLogic;

impl CheckLogic {
    /// Record one attendance attempt for an active shift.
    ///
    /// Malformed coordinates abort BEFORE anything is written: an
    /// `InvalidCoordinate` attempt is never recorded as an event. A valid
    /// position outside the radius IS recorded, with `accepted = false`.
    pub fn record(
        conn: &Connection,
        shift: &Shift,
        kind: EventKind,
        observed: GeoPoint,
    ) -> AppResult<AttendanceEvent> {
        let outlet = queries::load_outlet(conn, &shift.outlet_id)?
            .ok_or_else(|| AppError::UnknownOutlet(shift.outlet_id.clone()))?;

        let decision = geofence::evaluate(&outlet.center, outlet.radius_meters, &observed)?;

        let mut event = AttendanceEvent::new(
            shift.id,
            kind,
            observed,
            decision.distance_meters,
            decision.accepted,
        );
        event.id = queries::insert_attendance_event(conn, &event)?;

        let operation = match kind {
            EventKind::CheckIn => "check_in",
            EventKind::CheckOut => "check_out",
        };
        ttlog(
            conn,
            operation,
            &outlet.id,
            &format!(
                "{} at {:.1} m ({})",
                kind.ek_as_str(),
                decision.distance_meters,
                if decision.accepted { "accepted" } else { "rejected" }
            ),
        )?;

        Ok(event)
    }
}
