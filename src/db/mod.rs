pub mod seed;

use sea_orm::{Database, DatabaseConnection, EntityTrait};

use crate::config::Config;
use crate::entities::risk_zone;
use crate::error::{AppError, AppResult};
use crate::risk::RiskZone;

pub async fn connect(config: &Config) -> AppResult<DatabaseConnection> {
    Database::connect(&config.database_url)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to connect to database: {}", e)))
}

/// Snapshot of every stored zone, converted for the scoring engine
pub async fn load_zones(db: &DatabaseConnection) -> AppResult<Vec<RiskZone>> {
    let zones = risk_zone::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(RiskZone::from)
        .collect();
    Ok(zones)
}
