// src/export/model.rs

use serde::Serialize;

/// Flat row shape for attendance-event exports.
#[derive(Serialize, Clone, Debug)]
pub struct AttendanceExport {
    pub id: i64,
    pub shift_id: i64,
    pub outlet_id: String,
    pub kind: String,
    pub lat: f64,
    pub lng: f64,
    pub distance_meters: f64,
    pub accepted: bool,
    pub created_at: String,
}
