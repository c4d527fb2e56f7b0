use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::load_zones;
use crate::entities::route_plan;
use crate::error::{AppError, AppResult};
use crate::risk::{assess_route, RouteAssessment, RoutePlan, ScoredRoute};
use crate::utils::geo::Coordinate;
use crate::AppState;

// ============ Ad-hoc scoring ============

#[derive(Debug, Deserialize)]
pub struct ScoreRouteRequest {
    pub path: Vec<Coordinate>,
}

/// Score a caller-supplied path against the current zones
pub async fn score_route(
    State(state): State<AppState>,
    Json(payload): Json<ScoreRouteRequest>,
) -> AppResult<Json<RouteAssessment>> {
    for point in &payload.path {
        point.validate()?;
    }

    let zones = load_zones(&state.db).await?;
    Ok(Json(assess_route(&payload.path, &zones)?))
}

// ============ Fast vs. safe planning ============

#[derive(Debug, Deserialize)]
pub struct PlanRouteRequest {
    pub origin_lat: f64,
    pub origin_lng: f64,
    pub destination_lat: f64,
    pub destination_lng: f64,
    pub rider_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct PlanRouteResponse {
    pub id: Uuid,
    pub fast: ScoredRoute,
    pub safe: [ScoredRoute; 2],
}

/// Plan a fast route and two safer alternatives, and keep a record of it
pub async fn plan_route(
    State(state): State<AppState>,
    Json(payload): Json<PlanRouteRequest>,
) -> AppResult<Json<PlanRouteResponse>> {
    let origin = Coordinate::new(payload.origin_lat, payload.origin_lng);
    let destination = Coordinate::new(payload.destination_lat, payload.destination_lng);
    origin.validate()?;
    destination.validate()?;

    let zones = load_zones(&state.db).await?;
    let plan = state.planner.plan(origin, destination, &zones).await?;

    let id = Uuid::new_v4();
    save_plan(&state, id, payload.rider_id, origin, destination, &plan).await?;

    tracing::info!(
        plan_id = %id,
        rider_id = ?payload.rider_id,
        fast_risk = plan.fast.risk_score,
        safe_risk = plan.safe[0].risk_score,
        "Route plan computed"
    );

    let RoutePlan { fast, safe } = plan;
    Ok(Json(PlanRouteResponse { id, fast, safe }))
}

async fn save_plan(
    state: &AppState,
    id: Uuid,
    rider_id: Option<Uuid>,
    origin: Coordinate,
    destination: Coordinate,
    plan: &RoutePlan,
) -> AppResult<()> {
    let record = route_plan::ActiveModel {
        id: Set(id),
        rider_id: Set(rider_id),
        origin_lat: Set(origin.lat),
        origin_lng: Set(origin.lng),
        destination_lat: Set(destination.lat),
        destination_lng: Set(destination.lng),
        fast_route: Set(to_json(&plan.fast)?),
        safe_routes: Set(to_json(&plan.safe)?),
        fast_risk: Set(plan.fast.risk_score),
        safe_risk: Set(plan.safe[0].risk_score),
        selected: Set("fast".to_string()),
        created_at: Set(Utc::now().into()),
    };
    record.insert(&state.db).await?;
    Ok(())
}

fn to_json<T: Serialize>(value: &T) -> AppResult<serde_json::Value> {
    serde_json::to_value(value)
        .map_err(|e| AppError::Internal(format!("Failed to serialize route plan: {}", e)))
}

// ============ History ============

#[derive(Debug, Serialize)]
pub struct RoutePlanSummary {
    pub id: Uuid,
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub fast_risk: f64,
    pub safe_risk: f64,
    pub selected: String,
    pub created_at: DateTime<Utc>,
}

/// A rider's past plans, newest first
pub async fn rider_plans(
    State(state): State<AppState>,
    Path(rider_id): Path<Uuid>,
) -> AppResult<Json<Vec<RoutePlanSummary>>> {
    let plans = route_plan::Entity::find()
        .filter(route_plan::Column::RiderId.eq(rider_id))
        .order_by_desc(route_plan::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let responses = plans
        .into_iter()
        .map(|p| RoutePlanSummary {
            id: p.id,
            origin: Coordinate::new(p.origin_lat, p.origin_lng),
            destination: Coordinate::new(p.destination_lat, p.destination_lng),
            fast_risk: p.fast_risk,
            safe_risk: p.safe_risk,
            selected: p.selected,
            created_at: p.created_at.with_timezone(&Utc),
        })
        .collect();

    Ok(Json(responses))
}
