//! Migration to create the competitions table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Competitions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Competitions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Competitions::Slug)
                            .text()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Competitions::Name).text().not_null())
                    .col(ColumnDef::new(Competitions::Country).text().null())
                    .col(
                        ColumnDef::new(Competitions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Competitions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Exact (name, country) lookups happen on every ingested record
        manager
            .create_index(
                Index::create()
                    .name("idx_competitions_name_country")
                    .table(Competitions::Table)
                    .col(Competitions::Name)
                    .col(Competitions::Country)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_competitions_name_country")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Competitions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Competitions {
    Table,
    Id,
    Slug,
    Name,
    Country,
    CreatedAt,
    UpdatedAt,
}
