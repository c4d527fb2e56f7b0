use serde::Serialize;
use serde_json::{json, Value};

use crate::utils::geo::Coordinate;

/// Upper bound of the canonical zone score scale
pub const MAX_ZONE_SCORE: f64 = 10.0;

/// Legacy stores scored zones on 0-100
const LEGACY_MAX_ZONE_SCORE: f64 = 100.0;

/// Zones farther than this from every path point contribute nothing
pub const INFLUENCE_RADIUS_KM: f64 = 3.0;

/// Shape of a zone as stored. Only a center point is usable for scoring.
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneGeometry {
    Center(Coordinate),
    Unusable,
}

impl ZoneGeometry {
    /// Parse a stored geometry document of the form
    /// `{"center": {"lat": .., "lng": ..}}`.
    ///
    /// Polygons, missing keys and non-numeric values yield `Unusable`.
    /// Numeric strings are accepted since older records stored them that way.
    pub fn from_json(value: &Value) -> Self {
        let Some(center) = value.get("center") else {
            return ZoneGeometry::Unusable;
        };

        match (number(center.get("lat")), number(center.get("lng"))) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => {
                ZoneGeometry::Center(Coordinate::new(lat, lng))
            }
            _ => ZoneGeometry::Unusable,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ZoneGeometry::Center(c) => json!({ "center": { "lat": c.lat, "lng": c.lng } }),
            ZoneGeometry::Unusable => Value::Null,
        }
    }
}

fn number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A geographic danger area, read-only from the engine's point of view
#[derive(Debug, Clone, PartialEq)]
pub struct RiskZone {
    pub name: String,
    pub geometry: ZoneGeometry,
    /// Canonical 0-10 scale
    pub score: f64,
    /// Display only, never used for scoring
    pub radius_km: Option<f64>,
}

impl RiskZone {
    pub fn new(name: impl Into<String>, center: Coordinate, score: f64) -> Self {
        Self {
            name: name.into(),
            geometry: ZoneGeometry::Center(center),
            score,
            radius_km: None,
        }
    }

    pub fn with_radius(mut self, radius_km: f64) -> Self {
        self.radius_km = Some(radius_km);
        self
    }

    /// Center point, if the geometry reduces to a finite one
    pub fn center(&self) -> Option<Coordinate> {
        match self.geometry {
            ZoneGeometry::Center(c) if c.is_finite() => Some(c),
            _ => None,
        }
    }

    /// Locatable and carrying a finite, non-negative score
    pub fn is_scoreable(&self) -> bool {
        self.center().is_some() && self.score.is_finite() && self.score >= 0.0
    }
}

/// Concentric distance bands around a zone center
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    /// 0-1 km
    Near,
    /// 1-2 km
    Mid,
    /// 2-3 km
    Outer,
    /// Beyond 3 km, no effect
    Clear,
}

impl RiskBand {
    pub fn classify(distance_km: f64) -> Self {
        if distance_km <= 1.0 {
            RiskBand::Near
        } else if distance_km <= 2.0 {
            RiskBand::Mid
        } else if distance_km <= INFLUENCE_RADIUS_KM {
            RiskBand::Outer
        } else {
            RiskBand::Clear
        }
    }

    /// Multiplier applied to a zone's score at this distance.
    ///
    /// Piecewise linear and continuous at the band edges:
    /// 1.0 -> 0.7 -> 0.4 -> 0.0.
    pub fn decay_factor(distance_km: f64) -> f64 {
        let factor = match Self::classify(distance_km) {
            RiskBand::Near => 1.0 - distance_km * 0.3,
            RiskBand::Mid => 0.7 - (distance_km - 1.0) * 0.3,
            RiskBand::Outer => 0.4 - (distance_km - 2.0) * 0.4,
            RiskBand::Clear => 0.0,
        };
        factor.max(0.0)
    }
}

/// Bring an ingested score onto the canonical 0-10 scale.
///
/// Values in (10, 100] are legacy percentages and get divided by ten.
/// Anything negative, non-finite or above 100 is rejected.
pub fn normalize_score(raw: f64) -> Option<f64> {
    if !raw.is_finite() || raw < 0.0 || raw > LEGACY_MAX_ZONE_SCORE {
        return None;
    }
    if raw > MAX_ZONE_SCORE {
        Some(raw / 10.0)
    } else {
        Some(raw)
    }
}
