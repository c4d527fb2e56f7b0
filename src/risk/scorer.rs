//! Aggregate risk of a whole path against a zone snapshot.
//!
//! Every (path point, zone) pair inside the influence radius contributes
//! `zone.score * decay(distance)`. The contributions are then blended,
//! leaning harder on the worst one as it gets worse, so that a single
//! very close pass by a dangerous zone is not averaged away.

use serde::Serialize;

use crate::risk::proximity::{nearest, within_radius, ZoneDistance};
use crate::risk::zone::{RiskBand, RiskZone, INFLUENCE_RADIUS_KM};
use crate::risk::{round1, RiskError};
use crate::utils::geo::Coordinate;

pub const MIN_RISK: f64 = 1.0;
pub const MAX_RISK: f64 = 10.0;

/// Beyond the influence radius a zone still nudges the score up to this far
const FAR_FIELD_RADIUS_KM: f64 = 10.0;

/// Per-waypoint growth of the baselines
const LENGTH_INCREMENT: f64 = 0.005;

const NO_DATA_BASE: f64 = 2.5;
const NO_DATA_CAP: f64 = 4.0;

const CLEAR_BASE: f64 = 1.5;
const CLEAR_CAP: f64 = 3.5;

const FAR_FIELD_WEIGHT: f64 = 0.3;
const FAR_FIELD_FLOOR: f64 = 1.5;
const FAR_FIELD_CAP: f64 = 4.0;

/// What the final number was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBasis {
    /// No usable zone data at all; a low-to-moderate assumption
    NoZoneData,
    /// Zones exist but none is within the influence radius of the path
    FarField,
    /// At least one zone lies within the influence radius
    Proximity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteAssessment {
    pub risk_score: f64,
    pub basis: RiskBasis,
    pub nearest_zone: Option<String>,
    pub nearest_distance_km: Option<f64>,
    /// Number of (point, zone) pairs that contributed
    pub exposures: usize,
}

/// Running summary of the contribution pool
#[derive(Debug, Default)]
struct Exposure {
    sum: f64,
    count: usize,
    max: f64,
}

impl Exposure {
    fn add(&mut self, contribution: f64) {
        self.sum += contribution;
        self.count += 1;
        self.max = self.max.max(contribution);
    }

    fn blend(&self) -> f64 {
        let avg = self.sum / self.count as f64;
        let max_weight = if self.max >= 7.0 {
            0.7
        } else if self.max >= 5.0 {
            0.6
        } else {
            0.5
        };
        max_weight * self.max + (1.0 - max_weight) * avg
    }
}

fn validate_path(path: &[Coordinate]) -> Result<(), RiskError> {
    if path.is_empty() {
        return Err(RiskError::InvalidInput("path must contain at least one point".into()));
    }
    if let Some((i, p)) = path.iter().enumerate().find(|(_, p)| !p.is_finite()) {
        return Err(RiskError::InvalidInput(format!(
            "path point {} ({}, {}) is not a finite coordinate",
            i, p.lat, p.lng
        )));
    }
    Ok(())
}

/// Proportional nudge from a zone that is close but not necessarily pooled
fn far_field(zone: &RiskZone, distance_km: f64) -> f64 {
    (zone.score * (1.0 - distance_km / FAR_FIELD_RADIUS_KM) * FAR_FIELD_WEIGHT)
        .clamp(FAR_FIELD_FLOOR, FAR_FIELD_CAP)
}

fn finish(raw: f64) -> f64 {
    round1(raw.clamp(MIN_RISK, MAX_RISK))
}

/// Score a path and report how the score was reached
pub fn assess_route(path: &[Coordinate], zones: &[RiskZone]) -> Result<RouteAssessment, RiskError> {
    validate_path(path)?;

    let points = path.len() as f64;
    let scoreable: Vec<&RiskZone> = zones.iter().filter(|z| z.is_scoreable()).collect();

    let mut exposure = Exposure::default();
    let mut closest: Option<ZoneDistance<'_>> = None;

    for &point in path {
        if let Some(hit) = nearest(point, scoreable.iter().copied()) {
            if closest.is_none_or(|best| hit.distance_km < best.distance_km) {
                closest = Some(hit);
            }
        }

        for hit in within_radius(point, scoreable.iter().copied(), INFLUENCE_RADIUS_KM, usize::MAX) {
            let contribution = hit.zone.score * RiskBand::decay_factor(hit.distance_km);
            if contribution > 0.0 {
                exposure.add(contribution);
            }
        }
    }

    // Only empty when no zone is scoreable
    let Some(closest) = closest else {
        return Ok(RouteAssessment {
            risk_score: finish((NO_DATA_BASE + points * LENGTH_INCREMENT).min(NO_DATA_CAP)),
            basis: RiskBasis::NoZoneData,
            nearest_zone: None,
            nearest_distance_km: None,
            exposures: 0,
        });
    };
    let (nearest_zone, nearest_distance) = (closest.zone, closest.distance_km);

    let (raw, basis) = if exposure.count > 0 {
        // Entering the outer band must never score below staying just outside it
        let floor = far_field(nearest_zone, nearest_distance);
        (exposure.blend().max(floor), RiskBasis::Proximity)
    } else if nearest_distance <= FAR_FIELD_RADIUS_KM {
        (far_field(nearest_zone, nearest_distance), RiskBasis::FarField)
    } else {
        ((CLEAR_BASE + points * LENGTH_INCREMENT).min(CLEAR_CAP), RiskBasis::FarField)
    };

    tracing::trace!(
        points = path.len(),
        zones = scoreable.len(),
        exposures = exposure.count,
        nearest = %nearest_zone.name,
        nearest_km = nearest_distance,
        "route assessed"
    );

    Ok(RouteAssessment {
        risk_score: finish(raw),
        basis,
        nearest_zone: Some(nearest_zone.name.clone()),
        nearest_distance_km: Some(nearest_distance),
        exposures: exposure.count,
    })
}

/// Single risk figure in [1.0, 10.0] for a path
pub fn score_route(path: &[Coordinate], zones: &[RiskZone]) -> Result<f64, RiskError> {
    assess_route(path, zones).map(|a| a.risk_score)
}
