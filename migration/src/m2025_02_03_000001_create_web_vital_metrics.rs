//! Migration to create the web_vital_metrics table.
//!
//! Client-side performance metrics are append-only and keyed by the id the
//! browser reporter assigns to each measurement.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WebVitalMetrics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WebVitalMetrics::Id)
                            .text()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WebVitalMetrics::Name).text().not_null())
                    .col(ColumnDef::new(WebVitalMetrics::Value).double().not_null())
                    .col(ColumnDef::new(WebVitalMetrics::Rating).text().null())
                    .col(ColumnDef::new(WebVitalMetrics::Delta).double().null())
                    .col(ColumnDef::new(WebVitalMetrics::NavigationType).text().null())
                    .col(ColumnDef::new(WebVitalMetrics::Page).text().null())
                    .col(
                        ColumnDef::new(WebVitalMetrics::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WebVitalMetrics::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum WebVitalMetrics {
    Table,
    Id,
    Name,
    Value,
    Rating,
    Delta,
    NavigationType,
    Page,
    CreatedAt,
}
