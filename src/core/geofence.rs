//! Geofence evaluation: great-circle distance between an outlet center and
//! an observed position, accepted iff within the outlet radius.

use crate::errors::AppResult;
use crate::models::geo::GeoPoint;

/// Mean Earth radius of the sphere approximation, in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeofenceDecision {
    pub distance_meters: f64,
    pub accepted: bool,
}

/// Evaluate an observed position against an outlet geofence.
///
/// The boundary is inclusive: a point exactly on the radius is accepted.
/// Malformed coordinates fail with `InvalidCoordinate` before any distance
/// is computed. Pure and deterministic.
pub fn evaluate(
    center: &GeoPoint,
    radius_meters: u32,
    observed: &GeoPoint,
) -> AppResult<GeofenceDecision> {
    center.validate()?;
    observed.validate()?;

    let distance_meters = haversine_meters(center, observed);
    Ok(GeofenceDecision {
        distance_meters,
        accepted: distance_meters <= f64::from(radius_meters),
    })
}

/// Haversine great-circle distance on the sphere-approximated Earth.
fn haversine_meters(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);

    // clamp guards against floating-point drift pushing h just above 1
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_METERS * c
}
