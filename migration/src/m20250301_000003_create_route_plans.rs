use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RoutePlan::Table)
                    .if_not_exists()
                    .col(uuid(RoutePlan::Id).primary_key())
                    .col(uuid_null(RoutePlan::RiderId))
                    .col(double(RoutePlan::OriginLat).not_null())
                    .col(double(RoutePlan::OriginLng).not_null())
                    .col(double(RoutePlan::DestinationLat).not_null())
                    .col(double(RoutePlan::DestinationLng).not_null())
                    .col(json_binary(RoutePlan::FastRoute).not_null())
                    .col(json_binary(RoutePlan::SafeRoutes).not_null())
                    .col(double(RoutePlan::FastRisk).not_null())
                    .col(double(RoutePlan::SafeRisk).not_null())
                    .col(string_len(RoutePlan::Selected, 10).not_null())
                    .col(
                        timestamp_with_time_zone(RoutePlan::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_route_plan_rider_created")
                    .table(RoutePlan::Table)
                    .col(RoutePlan::RiderId)
                    .col(RoutePlan::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RoutePlan::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum RoutePlan {
    Table,
    Id,
    RiderId,
    OriginLat,
    OriginLng,
    DestinationLat,
    DestinationLng,
    FastRoute,
    SafeRoutes,
    FastRisk,
    SafeRisk,
    Selected,
    CreatedAt,
}
