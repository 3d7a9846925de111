use crate::errors::{AppError, AppResult};
use crate::models::attendance_event::AttendanceEvent;
use crate::models::event_kind::EventKind;
use crate::models::geo::GeoPoint;
use crate::models::outlet::Outlet;
use crate::models::progress_record::ProgressRecord;
use crate::models::session::Session;
use crate::models::shift::Shift;
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

// ---------------------------
// Session (single row, id = 1)
// ---------------------------

pub fn load_current_session(conn: &Connection) -> AppResult<Option<Session>> {
    let mut stmt = conn.prepare_cached(
        "SELECT marker, user_id, expires_at, created_at FROM session WHERE id = 1",
    )?;

    let session = stmt
        .query_row([], |row| {
            Ok(Session {
                marker: row.get(0)?,
                user_id: row.get(1)?,
                expires_at: row.get(2)?,
                created_at: row.get(3)?,
            })
        })
        .optional()?;

    Ok(session)
}

/// Replace the device session. Last login wins; the `id = 1` constraint
/// keeps a single current marker.
pub fn save_session(conn: &Connection, session: &Session) -> AppResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO session (id, marker, user_id, expires_at, created_at)
         VALUES (1, ?1, ?2, ?3, ?4)",
        params![
            session.marker,
            session.user_id,
            session.expires_at,
            session.created_at,
        ],
    )?;
    Ok(())
}

/// Destroy the device session. Returns the number of rows removed, so the
/// caller can tell "logged out" from "was not logged in".
pub fn delete_session(conn: &Connection) -> AppResult<usize> {
    let n = conn.execute("DELETE FROM session WHERE id = 1", [])?;
    Ok(n)
}

// ---------------------------
// Outlets
// ---------------------------

pub fn insert_outlet(conn: &Connection, outlet: &Outlet) -> AppResult<()> {
    conn.execute(
        "INSERT INTO outlets (id, name, lat, lng, radius_meters)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            outlet.id,
            outlet.name,
            outlet.center.lat,
            outlet.center.lng,
            outlet.radius_meters,
        ],
    )?;
    Ok(())
}

pub fn load_outlet(conn: &Connection, id: &str) -> AppResult<Option<Outlet>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, name, lat, lng, radius_meters FROM outlets WHERE id = ?1",
    )?;

    let outlet = stmt.query_row([id], map_outlet_row).optional()?;
    Ok(outlet)
}

pub fn list_outlets(conn: &Connection) -> AppResult<Vec<Outlet>> {
    let mut stmt =
        conn.prepare("SELECT id, name, lat, lng, radius_meters FROM outlets ORDER BY id ASC")?;

    let rows = stmt.query_map([], map_outlet_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

fn map_outlet_row(row: &Row) -> Result<Outlet> {
    Ok(Outlet {
        id: row.get(0)?,
        name: row.get(1)?,
        center: GeoPoint {
            lat: row.get(2)?,
            lng: row.get(3)?,
        },
        radius_meters: row.get(4)?,
    })
}

// ---------------------------
// Shifts
// ---------------------------

pub fn insert_shift(
    conn: &Connection,
    user_id: &str,
    outlet_id: &str,
    started_at: &str,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO shifts (user_id, outlet_id, started_at, ended_at)
         VALUES (?1, ?2, ?3, NULL)",
        params![user_id, outlet_id, started_at],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Find the user's active shift (ended_at IS NULL), optionally pinned to
/// one outlet. A user has at most one shift open at a time; `LIMIT 1`
/// guards against dirty data from older releases.
pub fn find_active_shift(
    conn: &Connection,
    user_id: &str,
    outlet_id: Option<&str>,
) -> AppResult<Option<Shift>> {
    let shift = match outlet_id {
        Some(outlet) => {
            let mut stmt = conn.prepare_cached(
                "SELECT id, user_id, outlet_id, started_at, ended_at FROM shifts
                 WHERE user_id = ?1 AND outlet_id = ?2 AND ended_at IS NULL
                 ORDER BY started_at DESC LIMIT 1",
            )?;
            stmt.query_row(params![user_id, outlet], map_shift_row)
                .optional()?
        }
        None => {
            let mut stmt = conn.prepare_cached(
                "SELECT id, user_id, outlet_id, started_at, ended_at FROM shifts
                 WHERE user_id = ?1 AND ended_at IS NULL
                 ORDER BY started_at DESC LIMIT 1",
            )?;
            stmt.query_row([user_id], map_shift_row).optional()?
        }
    };

    Ok(shift)
}

pub fn end_shift(conn: &Connection, shift_id: i64, ended_at: &str) -> AppResult<()> {
    conn.execute(
        "UPDATE shifts SET ended_at = ?1 WHERE id = ?2",
        params![ended_at, shift_id],
    )?;
    Ok(())
}

pub fn list_shifts(conn: &Connection, date: Option<&NaiveDate>) -> AppResult<Vec<Shift>> {
    let mut out = Vec::new();

    match date {
        Some(d) => {
            let day = d.format("%Y-%m-%d").to_string();
            let mut stmt = conn.prepare(
                "SELECT id, user_id, outlet_id, started_at, ended_at FROM shifts
                 WHERE substr(started_at, 1, 10) = ?1
                 ORDER BY started_at ASC",
            )?;
            let rows = stmt.query_map([day], map_shift_row)?;
            for r in rows {
                out.push(r?);
            }
        }
        None => {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, outlet_id, started_at, ended_at FROM shifts
                 ORDER BY started_at ASC",
            )?;
            let rows = stmt.query_map([], map_shift_row)?;
            for r in rows {
                out.push(r?);
            }
        }
    }

    Ok(out)
}

fn map_shift_row(row: &Row) -> Result<Shift> {
    Ok(Shift {
        id: row.get(0)?,
        user_id: row.get(1)?,
        outlet_id: row.get(2)?,
        started_at: row.get(3)?,
        ended_at: row.get(4)?,
    })
}

// ---------------------------
// Attendance events
// ---------------------------

pub fn insert_attendance_event(conn: &Connection, ev: &AttendanceEvent) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO attendance_events
             (shift_id, kind, lat, lng, distance_meters, accepted, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            ev.shift_id,
            ev.kind.to_db_str(),
            ev.observed.lat,
            ev.observed.lng,
            ev.distance_meters,
            if ev.accepted { 1 } else { 0 },
            ev.created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_attendance_events(
    conn: &Connection,
    date: Option<&NaiveDate>,
) -> AppResult<Vec<AttendanceEvent>> {
    let mut out = Vec::new();

    match date {
        Some(d) => {
            let day = d.format("%Y-%m-%d").to_string();
            let mut stmt = conn.prepare(
                "SELECT id, shift_id, kind, lat, lng, distance_meters, accepted, created_at
                 FROM attendance_events
                 WHERE substr(created_at, 1, 10) = ?1
                 ORDER BY created_at ASC",
            )?;
            let rows = stmt.query_map([day], map_event_row)?;
            for r in rows {
                out.push(r?);
            }
        }
        None => {
            let mut stmt = conn.prepare(
                "SELECT id, shift_id, kind, lat, lng, distance_meters, accepted, created_at
                 FROM attendance_events
                 ORDER BY created_at ASC",
            )?;
            let rows = stmt.query_map([], map_event_row)?;
            for r in rows {
                out.push(r?);
            }
        }
    }

    Ok(out)
}

pub fn map_event_row(row: &Row) -> Result<AttendanceEvent> {
    let kind_str: String = row.get(2)?;
    let kind = EventKind::from_db_str(&kind_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            Box::new(AppError::Other(format!("Invalid kind: {}", kind_str))),
        )
    })?;

    Ok(AttendanceEvent {
        id: row.get(0)?,
        shift_id: row.get(1)?,
        kind,
        observed: GeoPoint {
            lat: row.get(3)?,
            lng: row.get(4)?,
        },
        distance_meters: row.get(5)?,
        accepted: row.get::<_, i32>(6)? == 1,
        created_at: row.get(7)?,
    })
}

// ---------------------------
// Progress store
// ---------------------------

pub fn load_progress(conn: &Connection, flow: &str) -> AppResult<Option<ProgressRecord>> {
    let mut stmt = conn.prepare_cached(
        "SELECT steps, session_marker FROM progress WHERE flow_name = ?1",
    )?;

    let raw = stmt
        .query_row([flow], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })
        .optional()?;

    match raw {
        None => Ok(None),
        Some((steps, marker)) => {
            let record = ProgressRecord::deserialize_steps(flow, &marker, &steps)?;
            Ok(Some(record))
        }
    }
}

/// Single INSERT OR REPLACE: the write is atomic, readers see either the
/// old record or the new one, never a partial state.
pub fn save_progress(conn: &Connection, flow: &str, record: &ProgressRecord) -> AppResult<()> {
    let steps = record.serialize_steps()?;
    let now = chrono::Local::now().to_rfc3339();

    conn.execute(
        "INSERT OR REPLACE INTO progress (flow_name, steps, session_marker, updated_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![flow, steps, record.session_marker, now],
    )?;
    Ok(())
}

/// Clearing a flow with no stored record is a no-op, not an error.
pub fn clear_progress(conn: &Connection, flow: &str) -> AppResult<()> {
    conn.execute("DELETE FROM progress WHERE flow_name = ?1", [flow])?;
    Ok(())
}
