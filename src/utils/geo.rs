use serde::{Deserialize, Serialize};

use crate::risk::RiskError;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Reject non-finite or out-of-range coordinates coming from callers
    pub fn validate(&self) -> Result<(), RiskError> {
        if !self.is_finite() {
            return Err(RiskError::InvalidInput(format!(
                "coordinate ({}, {}) is not a finite number",
                self.lat, self.lng
            )));
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(RiskError::InvalidInput(format!(
                "latitude {} must be within [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(RiskError::InvalidInput(format!(
                "longitude {} must be within [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

/// Calculate distance between two coordinates using Haversine formula
/// Returns distance in kilometers
pub fn haversine_distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat1_rad = a.lat.to_radians();
    let lat2_rad = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push h a hair above 1.0 for antipodal points
    let c = 2.0 * h.min(1.0).sqrt().asin();

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEPITO: Coordinate = Coordinate::new(19.4497, -99.1247);
    const POLANCO: Coordinate = Coordinate::new(19.4331, -99.1936);

    #[test]
    fn test_haversine_tepito_polanco() {
        let distance = haversine_distance(TEPITO, POLANCO);
        // Roughly 7.5 km across the city
        assert!(distance > 7.0 && distance < 8.0, "got {distance}");
    }

    #[test]
    fn test_haversine_symmetric_and_zero() {
        assert_eq!(haversine_distance(TEPITO, TEPITO), 0.0);
        assert_eq!(
            haversine_distance(TEPITO, POLANCO),
            haversine_distance(POLANCO, TEPITO)
        );
    }

    #[test]
    fn test_haversine_antipodal_is_finite() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 180.0);
        let d = haversine_distance(a, b);
        assert!(d.is_finite());
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn test_validate_rejects_bad_coordinates() {
        assert!(TEPITO.validate().is_ok());
        assert!(Coordinate::new(91.0, 0.0).validate().is_err());
        assert!(Coordinate::new(0.0, -180.5).validate().is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).validate().is_err());
    }
}
