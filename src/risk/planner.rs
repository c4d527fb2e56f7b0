//! Fast vs. safe route selection.
//!
//! The provider's first path is the fast route. Its alternatives are
//! presumed safer and get a fixed risk discount; when it offers fewer than
//! two, variants of the fast route are synthesized so callers always get
//! exactly two safe candidates.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::risk::scorer::score_route;
use crate::risk::zone::RiskZone;
use crate::risk::{round1, round2, RiskError};
use crate::routing::{RawRoute, RoutingError, RoutingProvider};
use crate::utils::geo::Coordinate;

pub const DEFAULT_ROUTING_TIMEOUT: Duration = Duration::from_secs(10);

/// Risk multiplier for the first and second safe slot
const SAFE_DISCOUNTS: [f64; 2] = [0.75, 0.65];

/// Distance/duration multiplier for synthesized variants in each safe slot
const SYNTHETIC_STRETCH: [f64; 2] = [1.15, 1.25];

/// The provider returns at most this many paths; extras are ignored
const MAX_CANDIDATES: usize = 1 + SAFE_DISCOUNTS.len();

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRoute {
    pub distance_km: f64,
    pub duration_min: u32,
    pub risk_score: f64,
    pub path: Vec<Coordinate>,
    /// Derived from the fast route rather than proposed by the provider
    pub synthetic: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    pub fast: ScoredRoute,
    pub safe: [ScoredRoute; 2],
}

fn score_candidate(index: usize, raw: RawRoute, zones: &[RiskZone]) -> Result<ScoredRoute, RiskError> {
    // A broken provider geometry is the provider's failure, not the caller's
    if raw.path.is_empty() || raw.path.iter().any(|p| !p.is_finite()) {
        return Err(RoutingError::Malformed(format!("route {} has an unusable geometry", index)).into());
    }

    let risk_score = score_route(&raw.path, zones)?;
    Ok(ScoredRoute {
        distance_km: raw.distance_km,
        duration_min: raw.duration_min,
        risk_score,
        path: raw.path,
        synthetic: false,
    })
}

fn synthesize(fast: &ScoredRoute, slot: usize) -> ScoredRoute {
    let stretch = SYNTHETIC_STRETCH[slot];
    ScoredRoute {
        distance_km: round2(fast.distance_km * stretch),
        duration_min: (fast.duration_min as f64 * stretch).floor() as u32,
        risk_score: round1(fast.risk_score * SAFE_DISCOUNTS[slot]),
        path: fast.path.clone(),
        synthetic: true,
    }
}

/// Score the provider's candidates and arrange them into one fast and two
/// safe routes.
pub fn rank_alternatives(raw: Vec<RawRoute>, zones: &[RiskZone]) -> Result<RoutePlan, RiskError> {
    if raw.is_empty() {
        return Err(RoutingError::NoRoutes.into());
    }

    let mut candidates = raw
        .into_iter()
        .take(MAX_CANDIDATES)
        .enumerate()
        .map(|(i, r)| score_candidate(i, r, zones))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter();

    let Some(fast) = candidates.next() else {
        return Err(RoutingError::NoRoutes.into());
    };

    let mut next_safe = |slot: usize| match candidates.next() {
        Some(mut alternative) => {
            alternative.risk_score = round1(alternative.risk_score * SAFE_DISCOUNTS[slot]);
            alternative
        }
        None => synthesize(&fast, slot),
    };
    let safe = [next_safe(0), next_safe(1)];

    Ok(RoutePlan { fast, safe })
}

/// Plans routes through a routing provider, bounded by a timeout
#[derive(Clone)]
pub struct SafeRoutePlanner {
    provider: Arc<dyn RoutingProvider>,
    timeout: Duration,
}

impl SafeRoutePlanner {
    pub fn new(provider: Arc<dyn RoutingProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub async fn plan(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        zones: &[RiskZone],
    ) -> Result<RoutePlan, RiskError> {
        origin.validate()?;
        destination.validate()?;

        let raw = tokio::time::timeout(self.timeout, self.provider.alternatives(origin, destination))
            .await
            .map_err(|_| RoutingError::Timeout)??;

        let candidates = raw.len();
        let plan = rank_alternatives(raw, zones)?;

        tracing::debug!(
            candidates,
            fast_risk = plan.fast.risk_score,
            safe_risk = plan.safe[0].risk_score,
            synthesized = plan.safe.iter().filter(|r| r.synthetic).count(),
            "Route plan ranked"
        );

        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEPITO: Coordinate = Coordinate::new(19.4497, -99.1247);
    const ZOCALO: Coordinate = Coordinate::new(19.4326, -99.1332);
    const POLANCO: Coordinate = Coordinate::new(19.4331, -99.1936);

    fn zones() -> Vec<RiskZone> {
        vec![RiskZone::new("Tepito", TEPITO, 8.5)]
    }

    fn raw(path: Vec<Coordinate>, distance_km: f64, duration_min: u32) -> RawRoute {
        RawRoute { path, distance_km, duration_min }
    }

    #[test]
    fn test_single_route_synthesizes_two_variants() {
        let plan = rank_alternatives(vec![raw(vec![ZOCALO, TEPITO], 4.0, 20)], &zones()).unwrap();

        assert!(!plan.fast.synthetic);
        let fast_risk = plan.fast.risk_score;

        let [first, second] = &plan.safe;
        assert!(first.synthetic && second.synthetic);
        assert_eq!(first.distance_km, 4.6);
        assert_eq!(first.duration_min, 23);
        assert_eq!(first.risk_score, round1(fast_risk * 0.75));
        assert_eq!(second.distance_km, 5.0);
        assert_eq!(second.duration_min, 25);
        assert_eq!(second.risk_score, round1(fast_risk * 0.65));
        assert_eq!(first.path, plan.fast.path);
    }

    #[test]
    fn test_two_routes_discount_real_alternative_and_fill_second_slot() {
        let plan = rank_alternatives(
            vec![
                raw(vec![ZOCALO, TEPITO], 4.0, 20),
                raw(vec![ZOCALO, POLANCO], 7.0, 25),
            ],
            &zones(),
        )
        .unwrap();

        let alternative_risk = score_route(&[ZOCALO, POLANCO], &zones()).unwrap();
        assert!(!plan.safe[0].synthetic);
        assert_eq!(plan.safe[0].distance_km, 7.0);
        assert_eq!(plan.safe[0].risk_score, round1(alternative_risk * 0.75));

        assert!(plan.safe[1].synthetic);
        assert_eq!(plan.safe[1].distance_km, 5.0);
        assert_eq!(plan.safe[1].risk_score, round1(plan.fast.risk_score * 0.65));
    }

    #[test]
    fn test_three_routes_use_provider_alternatives() {
        let plan = rank_alternatives(
            vec![
                raw(vec![TEPITO], 4.0, 20),
                raw(vec![TEPITO], 5.0, 22),
                raw(vec![TEPITO], 6.0, 24),
                raw(vec![TEPITO], 9.0, 40),
            ],
            &zones(),
        )
        .unwrap();

        assert_eq!(plan.fast.risk_score, 8.5);
        assert!(plan.safe.iter().all(|r| !r.synthetic));
        // 8.5 * 0.75 = 6.375, 8.5 * 0.65 = 5.525
        assert_eq!(plan.safe[0].risk_score, 6.4);
        assert_eq!(plan.safe[1].risk_score, 5.5);
        assert_eq!(plan.safe[1].distance_km, 6.0);
    }

    #[test]
    fn test_no_routes_is_routing_unavailable() {
        let err = rank_alternatives(Vec::new(), &zones()).unwrap_err();
        assert!(matches!(err, RiskError::RoutingUnavailable(RoutingError::NoRoutes)));
    }

    #[test]
    fn test_empty_provider_geometry_is_routing_unavailable() {
        let err = rank_alternatives(vec![raw(Vec::new(), 1.0, 1)], &zones()).unwrap_err();
        assert!(matches!(err, RiskError::RoutingUnavailable(RoutingError::Malformed(_))));
    }
}
