use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RiskZone::Table)
                    .if_not_exists()
                    .col(pk_auto(RiskZone::Id))
                    .col(string_len(RiskZone::Name, 200).not_null().unique_key())
                    .col(json_binary(RiskZone::Geometry).not_null())
                    .col(double(RiskZone::Score).not_null())
                    .col(double_null(RiskZone::RadiusKm))
                    .col(integer(RiskZone::TotalAlerts).not_null().default(0))
                    .col(integer(RiskZone::PanicAlerts).not_null().default(0))
                    .col(integer(RiskZone::AccidentAlerts).not_null().default(0))
                    .col(
                        timestamp_with_time_zone(RiskZone::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RiskZone::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum RiskZone {
    Table,
    Id,
    Name,
    Geometry,
    Score,
    RadiusKm,
    TotalAlerts,
    PanicAlerts,
    AccidentAlerts,
    UpdatedAt,
}
