use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use rider_safety_backend::risk::{score_route, RiskError, RiskZone, SafeRoutePlanner};
use rider_safety_backend::routing::{RawRoute, RoutingError, RoutingProvider};
use rider_safety_backend::utils::geo::Coordinate;

const TEPITO: Coordinate = Coordinate::new(19.4497, -99.1247);
const ZOCALO: Coordinate = Coordinate::new(19.4326, -99.1332);
const POLANCO: Coordinate = Coordinate::new(19.4331, -99.1936);

enum Behaviour {
    Routes(Vec<RawRoute>),
    Fail(u16),
    Hang,
}

struct FakeProvider {
    behaviour: Behaviour,
    calls: AtomicUsize,
}

impl FakeProvider {
    fn new(behaviour: Behaviour) -> Arc<Self> {
        Arc::new(Self {
            behaviour,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl RoutingProvider for FakeProvider {
    async fn alternatives(
        &self,
        _origin: Coordinate,
        _destination: Coordinate,
    ) -> Result<Vec<RawRoute>, RoutingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behaviour {
            Behaviour::Routes(routes) => Ok(routes.clone()),
            Behaviour::Fail(status) => Err(RoutingError::Status(*status)),
            Behaviour::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(Vec::new())
            }
        }
    }
}

fn zones() -> Vec<RiskZone> {
    vec![
        RiskZone::new("Tepito", TEPITO, 8.5),
        RiskZone::new("Polanco", POLANCO, 3.2),
    ]
}

fn route(path: Vec<Coordinate>, distance_km: f64, duration_min: u32) -> RawRoute {
    RawRoute {
        path,
        distance_km,
        duration_min,
    }
}

fn planner(provider: Arc<FakeProvider>) -> SafeRoutePlanner {
    SafeRoutePlanner::new(provider, Duration::from_millis(200))
}

#[tokio::test]
async fn test_plan_always_returns_one_fast_and_two_safe() {
    let all = vec![
        route(vec![ZOCALO, TEPITO], 2.3, 9),
        route(vec![ZOCALO, POLANCO, TEPITO], 9.8, 26),
        route(vec![ZOCALO, POLANCO], 7.1, 20),
    ];

    for supplied in 1..=3 {
        let provider = FakeProvider::new(Behaviour::Routes(all[..supplied].to_vec()));
        let plan = planner(provider)
            .plan(ZOCALO, TEPITO, &zones())
            .await
            .expect("plan succeeds");

        assert_eq!(plan.fast.distance_km, 2.3);
        assert_eq!(plan.safe.len(), 2);
        let synthesized = plan.safe.iter().filter(|r| r.synthetic).count();
        assert_eq!(synthesized, 3 - supplied);
    }
}

#[tokio::test]
async fn test_plan_through_zone_center_scores_zone_value() {
    let provider = FakeProvider::new(Behaviour::Routes(vec![route(vec![TEPITO], 0.1, 1)]));
    let plan = planner(provider)
        .plan(TEPITO, TEPITO, &[RiskZone::new("Tepito", TEPITO, 8.5)])
        .await
        .unwrap();

    assert_eq!(plan.fast.risk_score, 8.5);
    // 8.5 * 0.75 and 8.5 * 0.65, one decimal
    assert_eq!(plan.safe[0].risk_score, 6.4);
    assert_eq!(plan.safe[1].risk_score, 5.5);
}

#[tokio::test]
async fn test_far_route_is_low_risk_not_an_error() {
    // About 15 km north of Tepito
    let far = Coordinate::new(19.5846, -99.1247);
    let risk = score_route(&[far], &[RiskZone::new("Tepito", TEPITO, 8.5)]).unwrap();
    assert!(risk <= 3.5, "got {risk}");
}

#[tokio::test]
async fn test_timeout_is_routing_unavailable() {
    let provider = FakeProvider::new(Behaviour::Hang);
    let planner = SafeRoutePlanner::new(provider.clone(), Duration::from_millis(50));

    let err = planner.plan(ZOCALO, TEPITO, &zones()).await.unwrap_err();

    assert!(matches!(err, RiskError::RoutingUnavailable(RoutingError::Timeout)));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_provider_failure_is_routing_unavailable() {
    let provider = FakeProvider::new(Behaviour::Fail(502));
    let err = planner(provider).plan(ZOCALO, TEPITO, &zones()).await.unwrap_err();
    assert!(matches!(err, RiskError::RoutingUnavailable(RoutingError::Status(502))));
}

#[tokio::test]
async fn test_provider_with_no_routes_is_routing_unavailable() {
    let provider = FakeProvider::new(Behaviour::Routes(Vec::new()));
    let err = planner(provider).plan(ZOCALO, TEPITO, &zones()).await.unwrap_err();
    assert!(matches!(err, RiskError::RoutingUnavailable(RoutingError::NoRoutes)));
}

#[tokio::test]
async fn test_invalid_origin_never_reaches_provider() {
    let provider = FakeProvider::new(Behaviour::Routes(vec![route(vec![ZOCALO], 1.0, 1)]));
    let err = planner(provider.clone())
        .plan(Coordinate::new(95.0, -99.0), TEPITO, &zones())
        .await
        .unwrap_err();

    assert!(matches!(err, RiskError::InvalidInput(_)));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_plan_without_zone_data_uses_baseline() {
    let provider = FakeProvider::new(Behaviour::Routes(vec![route(vec![ZOCALO, TEPITO], 2.3, 9)]));
    let plan = planner(provider).plan(ZOCALO, TEPITO, &[]).await.unwrap();

    assert!(plan.fast.risk_score <= 4.0);
    assert!(plan.safe.iter().all(|r| r.risk_score < plan.fast.risk_score));
}
