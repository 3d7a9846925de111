use super::geo::GeoPoint;
use serde::Serialize;

/// A retail location with a fixed GPS center and an allowed check-in radius.
/// Immutable reference data once seeded.
#[derive(Debug, Clone, Serialize)]
pub struct Outlet {
    pub id: String,
    pub name: String,
    pub center: GeoPoint,
    pub radius_meters: u32,
}
