use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::risk::{normalize_score, RiskZone, ZoneGeometry};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "risk_zone")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    /// `{"center": {"lat", "lng"}}`; legacy rows may hold polygons
    pub geometry: Json,
    pub score: f64,
    pub radius_km: Option<f64>,
    pub total_alerts: i32,
    pub panic_alerts: i32,
    pub accident_alerts: i32,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for RiskZone {
    fn from(model: Model) -> Self {
        let geometry = ZoneGeometry::from_json(&model.geometry);
        if geometry == ZoneGeometry::Unusable {
            tracing::debug!(zone = %model.name, "Zone geometry has no usable center");
        }

        // Legacy rows are on 0-100; anything unreadable drops out of scoring
        let score = normalize_score(model.score).unwrap_or_else(|| {
            tracing::debug!(zone = %model.name, score = model.score, "Zone score is out of range");
            f64::NAN
        });

        RiskZone {
            name: model.name,
            geometry,
            score,
            radius_km: model.radius_km,
        }
    }
}
