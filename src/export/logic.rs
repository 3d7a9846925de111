// src/export/logic.rs

use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::AttendanceExport;
use crate::export::range::parse_range;
use crate::ui::messages::warning;

use chrono::NaiveDate;
use rusqlite::Row;
use rusqlite::params;
use std::io;
use std::path::Path;

/// High-level export logic.
pub struct ExportLogic;

impl ExportLogic {
    /// Export attendance events.
    ///
    /// - `format`: "csv" | "json"
    /// - `file`: absolute path of the output file
    /// - `range`: `None`, `"all"` or expressions like:
    ///   - `YYYY`
    ///   - `YYYY-MM`
    ///   - `YYYY-MM-DD`
    ///   - `YYYY:YYYY`
    ///   - `YYYY-MM:YYYY-MM`
    ///   - `YYYY-MM-DD:YYYY-MM-DD`
    pub fn export(
        pool: &mut DbPool,
        format: ExportFormat,
        file: &str,
        range: &Option<String>,
        force: bool,
    ) -> AppResult<()> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::from(io::Error::other(format!(
                "Output file path must be absolute: {file}"
            ))));
        }

        ensure_writable(path, force)?;

        let date_bounds: Option<(NaiveDate, NaiveDate)> = match range {
            None => None,
            Some(r) if r.eq_ignore_ascii_case("all") => None,
            Some(r) => Some(parse_range(r)?),
        };

        let events = load_events(pool, date_bounds)?;

        if events.is_empty() {
            warning("⚠️  No attendance events found for selected range.");
            return Ok(());
        }

        match format {
            ExportFormat::Csv => export_csv(&events, path)?,
            ExportFormat::Json => export_json(&events, path)?,
        }

        Ok(())
    }
}

/// Load events from the DB according to the bounds. The shifts join pulls
/// the outlet id into the flat row.
fn load_events(
    pool: &mut DbPool,
    bounds: Option<(NaiveDate, NaiveDate)>,
) -> AppResult<Vec<AttendanceExport>> {
    let conn = &mut pool.conn;

    let mut events = Vec::new();

    match bounds {
        None => {
            let mut stmt = conn.prepare(
                "SELECT e.id, e.shift_id, s.outlet_id, e.kind, e.lat, e.lng,
                        e.distance_meters, e.accepted, e.created_at
                 FROM attendance_events e
                 JOIN shifts s ON s.id = e.shift_id
                 ORDER BY e.created_at ASC",
            )?;

            let rows = stmt.query_map([], map_row)?;

            for r in rows {
                events.push(r?);
            }
        }
        Some((start, end)) => {
            let start_str = start.format("%Y-%m-%d").to_string();
            let end_str = end.format("%Y-%m-%d").to_string();

            let mut stmt = conn.prepare(
                "SELECT e.id, e.shift_id, s.outlet_id, e.kind, e.lat, e.lng,
                        e.distance_meters, e.accepted, e.created_at
                 FROM attendance_events e
                 JOIN shifts s ON s.id = e.shift_id
                 WHERE substr(e.created_at, 1, 10) BETWEEN ?1 AND ?2
                 ORDER BY e.created_at ASC",
            )?;

            let rows = stmt.query_map(params![start_str, end_str], map_row)?;

            for r in rows {
                events.push(r?);
            }
        }
    }

    Ok(events)
}

/// Mapping DB → AttendanceExport (shared by both queries).
fn map_row(row: &Row<'_>) -> rusqlite::Result<AttendanceExport> {
    Ok(AttendanceExport {
        id: row.get(0)?,
        shift_id: row.get(1)?,
        outlet_id: row.get(2)?,
        kind: row.get(3)?,
        lat: row.get(4)?,
        lng: row.get(5)?,
        distance_meters: row.get(6)?,
        accepted: row.get::<_, i32>(7)? == 1,
        created_at: row.get(8)?,
    })
}
