use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::load_zones;
use crate::entities::rider_location;
use crate::error::{AppError, AppResult};
use crate::handlers::zones::nearby_bounds;
use crate::risk::{self, round1, NearbyZone};
use crate::utils::geo::Coordinate;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateLocationRequest {
    pub lat: f64,
    pub lng: f64,
    pub accuracy_m: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct LocationResponse {
    pub rider_id: Uuid,
    pub position: Coordinate,
    pub accuracy_m: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

impl From<rider_location::Model> for LocationResponse {
    fn from(l: rider_location::Model) -> Self {
        Self {
            rider_id: l.rider_id,
            position: l.position(),
            accuracy_m: l.accuracy_m,
            updated_at: l.updated_at.with_timezone(&Utc),
        }
    }
}

/// Record a rider's latest position
pub async fn update_location(
    State(state): State<AppState>,
    Path(rider_id): Path<Uuid>,
    Json(payload): Json<UpdateLocationRequest>,
) -> AppResult<Json<LocationResponse>> {
    Coordinate::new(payload.lat, payload.lng).validate()?;
    if let Some(accuracy) = payload.accuracy_m {
        if !accuracy.is_finite() || accuracy < 0.0 {
            return Err(AppError::BadRequest(
                "accuracy_m must be a non-negative number".to_string(),
            ));
        }
    }

    let existing = rider_location::Entity::find_by_id(rider_id)
        .one(&state.db)
        .await?;

    let saved = match existing {
        Some(location) => {
            let mut active: rider_location::ActiveModel = location.into();
            active.lat = Set(payload.lat);
            active.lng = Set(payload.lng);
            active.accuracy_m = Set(payload.accuracy_m);
            active.updated_at = Set(Utc::now().into());
            active.update(&state.db).await?
        }
        None => {
            rider_location::ActiveModel {
                rider_id: Set(rider_id),
                lat: Set(payload.lat),
                lng: Set(payload.lng),
                accuracy_m: Set(payload.accuracy_m),
                updated_at: Set(Utc::now().into()),
            }
            .insert(&state.db)
            .await?
        }
    };

    tracing::debug!(%rider_id, lat = saved.lat, lng = saved.lng, "Rider location updated");

    Ok(Json(saved.into()))
}

#[derive(Debug, Deserialize)]
pub struct RiderNearbyQuery {
    pub radius_km: Option<f64>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RiderNearbyResponse {
    pub rider_id: Uuid,
    pub position: Coordinate,
    pub located_at: DateTime<Utc>,
    /// Closest zone at any range; `None` when no zone is locatable
    pub nearest_zone_km: Option<f64>,
    pub zones: Vec<NearbyZone>,
}

/// Zones closest to the rider's last known position
pub async fn rider_nearby_zones(
    State(state): State<AppState>,
    Path(rider_id): Path<Uuid>,
    Query(query): Query<RiderNearbyQuery>,
) -> AppResult<Json<RiderNearbyResponse>> {
    let (radius_km, limit) = nearby_bounds(query.radius_km, query.limit, &state)?;

    let location = rider_location::Entity::find_by_id(rider_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("No known location for rider".to_string()))?;

    let zones = load_zones(&state.db).await?;
    let position = location.position();
    let nearest_km = risk::nearest_distance(position, &zones);

    Ok(Json(RiderNearbyResponse {
        rider_id,
        position,
        located_at: location.updated_at.with_timezone(&Utc),
        nearest_zone_km: nearest_km.is_finite().then(|| round1(nearest_km)),
        zones: risk::nearby(position, &zones, radius_km, limit),
    }))
}
