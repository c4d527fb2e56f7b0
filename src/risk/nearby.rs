use serde::Serialize;

use crate::risk::proximity::within_radius;
use crate::risk::round1;
use crate::risk::zone::{RiskBand, RiskZone};
use crate::utils::geo::Coordinate;

pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 10.0;
pub const DEFAULT_NEARBY_LIMIT: usize = 5;

/// Dashboard entry for a zone close to a rider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyZone {
    pub name: String,
    pub score: f64,
    pub radius_km: Option<f64>,
    pub center: Coordinate,
    pub distance_km: f64,
    pub band: RiskBand,
}

/// Closest zones to `point` within `radius_km`, at most `limit`, nearest first
pub fn nearby(point: Coordinate, zones: &[RiskZone], radius_km: f64, limit: usize) -> Vec<NearbyZone> {
    within_radius(point, zones, radius_km, limit)
        .into_iter()
        .filter_map(|hit| {
            let center = hit.zone.center()?;
            Some(NearbyZone {
                name: hit.zone.name.clone(),
                score: hit.zone.score,
                radius_km: hit.zone.radius_km,
                center,
                distance_km: round1(hit.distance_km),
                band: hit.band(),
            })
        })
        .collect()
}
