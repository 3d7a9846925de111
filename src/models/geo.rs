use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// A GPS position in signed decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Build a point, rejecting NaN and out-of-range values.
    /// Malformed input is always reported, never clamped.
    pub fn new(lat: f64, lng: f64) -> AppResult<Self> {
        let p = Self { lat, lng };
        p.validate()?;
        Ok(p)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.lat.is_nan() || self.lng.is_nan() {
            return Err(AppError::InvalidCoordinate(format!(
                "lat={}, lng={} (NaN not allowed)",
                self.lat, self.lng
            )));
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(AppError::InvalidCoordinate(format!(
                "latitude {} outside [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(AppError::InvalidCoordinate(format!(
                "longitude {} outside [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }
}
