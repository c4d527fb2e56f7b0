use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::{self, plans, riders, zones};
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Zone catalogue and ad-hoc proximity lookups
    let zone_routes = Router::new()
        .route("/", get(zones::list_zones))
        .route("/nearby", get(zones::nearby_zones));

    // Scoring and fast/safe planning
    let route_routes = Router::new()
        .route("/score", post(plans::score_route))
        .route("/plan", post(plans::plan_route));

    // Per-rider position, dashboard zones and plan history
    let rider_routes = Router::new()
        .route("/{id}/location", put(riders::update_location))
        .route("/{id}/nearby-zones", get(riders::rider_nearby_zones))
        .route("/{id}/route-plans", get(plans::rider_plans));

    Router::new()
        .route("/api/health", get(handlers::health))
        .nest("/api/zones", zone_routes)
        .nest("/api/routes", route_routes)
        .nest("/api/riders", rider_routes)
        .with_state(state)
}
