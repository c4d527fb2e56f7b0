pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_risk_zones;
mod m20250301_000002_create_rider_locations;
mod m20250301_000003_create_route_plans;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_risk_zones::Migration),
            Box::new(m20250301_000002_create_rider_locations::Migration),
            Box::new(m20250301_000003_create_route_plans::Migration),
        ]
    }
}
