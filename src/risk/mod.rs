//! Geospatial risk scoring and safe-route selection.
//!
//! Everything here is a pure function over a zone snapshot the caller
//! passes in, except [`planner::SafeRoutePlanner::plan`] which also awaits
//! the routing provider.

pub mod nearby;
pub mod planner;
pub mod proximity;
pub mod scorer;
pub mod zone;

use thiserror::Error;

use crate::routing::RoutingError;

pub use nearby::{nearby, NearbyZone, DEFAULT_NEARBY_LIMIT, DEFAULT_NEARBY_RADIUS_KM};
pub use planner::{rank_alternatives, RoutePlan, SafeRoutePlanner, ScoredRoute};
pub use proximity::{nearest, nearest_distance, within_radius, ZoneDistance};
pub use scorer::{assess_route, score_route, RiskBasis, RouteAssessment};
pub use zone::{normalize_score, RiskBand, RiskZone, ZoneGeometry};

#[derive(Debug, Error)]
pub enum RiskError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("routing provider unavailable: {0}")]
    RoutingUnavailable(#[source] RoutingError),
}

impl From<RoutingError> for RiskError {
    fn from(err: RoutingError) -> Self {
        RiskError::RoutingUnavailable(err)
    }
}

/// Round to one decimal place
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to two decimal places
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
