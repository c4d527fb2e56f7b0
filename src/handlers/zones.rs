use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use sea_orm::{EntityTrait, QueryOrder};
use serde::{Deserialize, Serialize};

use crate::entities::risk_zone;
use crate::error::{AppError, AppResult};
use crate::risk::{self, normalize_score, NearbyZone, ZoneGeometry};
use crate::utils::geo::Coordinate;
use crate::AppState;

/// Largest radius a nearby query may ask for
const MAX_NEARBY_RADIUS_KM: f64 = 100.0;
const MAX_NEARBY_LIMIT: usize = 50;

#[derive(Debug, Serialize)]
pub struct ZoneInfo {
    pub id: i32,
    pub name: String,
    /// Absent for zones whose stored geometry has no usable center
    pub center: Option<Coordinate>,
    /// Canonical 0-10 score; absent when the stored value is out of range
    pub score: Option<f64>,
    pub radius_km: Option<f64>,
    pub total_alerts: i32,
    pub panic_alerts: i32,
    pub accident_alerts: i32,
    pub updated_at: DateTime<Utc>,
}

impl From<risk_zone::Model> for ZoneInfo {
    fn from(z: risk_zone::Model) -> Self {
        let center = match ZoneGeometry::from_json(&z.geometry) {
            ZoneGeometry::Center(c) => Some(c),
            ZoneGeometry::Unusable => None,
        };
        Self {
            id: z.id,
            name: z.name,
            center,
            score: normalize_score(z.score),
            radius_km: z.radius_km,
            total_alerts: z.total_alerts,
            panic_alerts: z.panic_alerts,
            accident_alerts: z.accident_alerts,
            updated_at: z.updated_at.with_timezone(&Utc),
        }
    }
}

/// List all zones, most dangerous first
pub async fn list_zones(State(state): State<AppState>) -> AppResult<Json<Vec<ZoneInfo>>> {
    let zones = risk_zone::Entity::find()
        .order_by_asc(risk_zone::Column::Name)
        .all(&state.db)
        .await?;

    // Sorted after normalization so legacy 0-100 rows rank by their real weight
    let mut zones: Vec<ZoneInfo> = zones.into_iter().map(ZoneInfo::from).collect();
    zones.sort_by(|a, b| {
        let (a, b) = (a.score.unwrap_or(f64::NEG_INFINITY), b.score.unwrap_or(f64::NEG_INFINITY));
        b.total_cmp(&a)
    });

    Ok(Json(zones))
}

#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lng: f64,
    pub radius_km: Option<f64>,
    pub limit: Option<usize>,
}

/// Resolve and bound the optional radius/limit of a nearby query
pub fn nearby_bounds(
    radius_km: Option<f64>,
    limit: Option<usize>,
    state: &AppState,
) -> AppResult<(f64, usize)> {
    let radius_km = radius_km.unwrap_or(state.config.nearby_radius_km);
    if !radius_km.is_finite() || radius_km <= 0.0 || radius_km > MAX_NEARBY_RADIUS_KM {
        return Err(AppError::BadRequest(format!(
            "radius_km must be greater than 0 and at most {}",
            MAX_NEARBY_RADIUS_KM
        )));
    }

    let limit = limit.unwrap_or(state.config.nearby_limit);
    if limit == 0 || limit > MAX_NEARBY_LIMIT {
        return Err(AppError::BadRequest(format!(
            "limit must be between 1 and {}",
            MAX_NEARBY_LIMIT
        )));
    }

    Ok((radius_km, limit))
}

/// Zones close to an arbitrary point
pub async fn nearby_zones(
    State(state): State<AppState>,
    Query(query): Query<NearbyQuery>,
) -> AppResult<Json<Vec<NearbyZone>>> {
    let point = Coordinate::new(query.lat, query.lng);
    point.validate()?;
    let (radius_km, limit) = nearby_bounds(query.radius_km, query.limit, &state)?;

    let zones = crate::db::load_zones(&state.db).await?;
    Ok(Json(risk::nearby(point, &zones, radius_km, limit)))
}
