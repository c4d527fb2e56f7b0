//! Demo risk zones for Mexico City, upserted by name at startup.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::entities::risk_zone;
use crate::error::AppResult;
use crate::risk::{normalize_score, ZoneGeometry};
use crate::utils::geo::Coordinate;

pub struct ZoneSeed {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
    /// May be on the legacy 0-100 scale
    pub score: f64,
    pub panic_alerts: i32,
    pub accident_alerts: i32,
}

pub const DEMO_ZONES: &[ZoneSeed] = &[
    ZoneSeed { name: "Tepito", lat: 19.4497, lng: -99.1247, score: 8.5, panic_alerts: 28, accident_alerts: 17 },
    ZoneSeed { name: "Doctores", lat: 19.4242, lng: -99.1456, score: 7.2, panic_alerts: 20, accident_alerts: 12 },
    ZoneSeed { name: "La Merced", lat: 19.4258, lng: -99.1250, score: 7.8, panic_alerts: 24, accident_alerts: 14 },
    ZoneSeed { name: "Iztapalapa Centro", lat: 19.3467, lng: -99.0550, score: 6.5, panic_alerts: 16, accident_alerts: 12 },
    ZoneSeed { name: "Ecatepec Norte", lat: 19.6177, lng: -99.0536, score: 8.0, panic_alerts: 26, accident_alerts: 16 },
    ZoneSeed { name: "Neza Centro", lat: 19.4008, lng: -99.0144, score: 7.5, panic_alerts: 22, accident_alerts: 13 },
    ZoneSeed { name: "Polanco", lat: 19.4331, lng: -99.1936, score: 3.2, panic_alerts: 3, accident_alerts: 5 },
    ZoneSeed { name: "Santa Fe", lat: 19.3602, lng: -99.2675, score: 2.8, panic_alerts: 2, accident_alerts: 4 },
    ZoneSeed { name: "Gustavo A. Madero", lat: 19.4906, lng: -99.1167, score: 6.8, panic_alerts: 18, accident_alerts: 12 },
    ZoneSeed { name: "Xochimilco", lat: 19.2544, lng: -99.1036, score: 5.5, panic_alerts: 12, accident_alerts: 10 },
];

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedOutcome {
    pub inserted: usize,
    pub updated: usize,
    pub rejected: usize,
}

/// Insert or refresh each seed, keyed by zone name.
///
/// Scores are normalized onto the 0-10 scale here so the scorer never has
/// to guess which scale a row uses.
pub async fn seed_zones(db: &DatabaseConnection, seeds: &[ZoneSeed]) -> AppResult<SeedOutcome> {
    let mut outcome = SeedOutcome::default();

    for seed in seeds {
        let Some(score) = normalize_score(seed.score) else {
            tracing::warn!(zone = seed.name, score = seed.score, "Rejecting zone seed with out-of-range score");
            outcome.rejected += 1;
            continue;
        };
        let geometry = ZoneGeometry::Center(Coordinate::new(seed.lat, seed.lng)).to_json();

        let existing = risk_zone::Entity::find()
            .filter(risk_zone::Column::Name.eq(seed.name))
            .one(db)
            .await?;

        match existing {
            Some(zone) => {
                let mut active: risk_zone::ActiveModel = zone.into();
                active.geometry = Set(geometry);
                active.score = Set(score);
                active.total_alerts = Set(seed.panic_alerts + seed.accident_alerts);
                active.panic_alerts = Set(seed.panic_alerts);
                active.accident_alerts = Set(seed.accident_alerts);
                active.updated_at = Set(Utc::now().into());
                active.update(db).await?;
                outcome.updated += 1;
            }
            None => {
                let zone = risk_zone::ActiveModel {
                    name: Set(seed.name.to_string()),
                    geometry: Set(geometry),
                    score: Set(score),
                    radius_km: Set(None),
                    total_alerts: Set(seed.panic_alerts + seed.accident_alerts),
                    panic_alerts: Set(seed.panic_alerts),
                    accident_alerts: Set(seed.accident_alerts),
                    updated_at: Set(Utc::now().into()),
                    ..Default::default()
                };
                zone.insert(db).await?;
                outcome.inserted += 1;
            }
        }
    }

    tracing::info!(
        inserted = outcome.inserted,
        updated = outcome.updated,
        rejected = outcome.rejected,
        "Risk zones seeded"
    );
    Ok(outcome)
}
