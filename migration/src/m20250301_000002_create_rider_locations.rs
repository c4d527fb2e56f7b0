use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RiderLocation::Table)
                    .if_not_exists()
                    .col(uuid(RiderLocation::RiderId).primary_key())
                    .col(double(RiderLocation::Lat).not_null())
                    .col(double(RiderLocation::Lng).not_null())
                    .col(double_null(RiderLocation::AccuracyM))
                    .col(
                        timestamp_with_time_zone(RiderLocation::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RiderLocation::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum RiderLocation {
    Table,
    RiderId,
    Lat,
    Lng,
    AccuracyM,
    UpdatedAt,
}
