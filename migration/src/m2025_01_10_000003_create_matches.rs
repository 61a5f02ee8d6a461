//! Migration to create the matches table.
//!
//! A match references two teams and a competition and is identified by the
//! feed's external id (`ext_id`), which carries a unique constraint so that
//! concurrent ingestion runs converge on a single row.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Matches::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Matches::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Matches::ExtId).text().not_null().unique_key())
                    .col(ColumnDef::new(Matches::HomeTeamId).integer().not_null())
                    .col(ColumnDef::new(Matches::AwayTeamId).integer().not_null())
                    .col(ColumnDef::new(Matches::CompetitionId).integer().not_null())
                    .col(
                        ColumnDef::new(Matches::MatchDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Matches::Title).text().not_null())
                    .col(
                        ColumnDef::new(Matches::Status)
                            .text()
                            .not_null()
                            .default("scheduled"),
                    )
                    .col(
                        ColumnDef::new(Matches::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Matches::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_matches_home_team_id")
                            .from(Matches::Table, Matches::HomeTeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_matches_away_team_id")
                            .from(Matches::Table, Matches::AwayTeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_matches_competition_id")
                            .from(Matches::Table, Matches::CompetitionId)
                            .to(Competitions::Table, Competitions::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_matches_competition_id")
                    .table(Matches::Table)
                    .col(Matches::CompetitionId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_matches_home_team_id")
                    .table(Matches::Table)
                    .col(Matches::HomeTeamId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_matches_away_team_id")
                    .table(Matches::Table)
                    .col(Matches::AwayTeamId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_matches_competition_id",
            "idx_matches_home_team_id",
            "idx_matches_away_team_id",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }

        manager
            .drop_table(Table::drop().table(Matches::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Matches {
    Table,
    Id,
    ExtId,
    HomeTeamId,
    AwayTeamId,
    CompetitionId,
    MatchDate,
    Title,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Teams {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Competitions {
    Table,
    Id,
}
