//! Migration to create the videos table.
//!
//! Video ids are the hex-encoded SHA-256 of the raw feed object, stored as
//! text so the full digest is the primary key.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Videos::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Videos::Id).text().not_null().primary_key())
                    .col(ColumnDef::new(Videos::MatchId).integer().not_null())
                    .col(ColumnDef::new(Videos::Title).text().not_null())
                    .col(ColumnDef::new(Videos::EmbedHtml).text().not_null())
                    .col(ColumnDef::new(Videos::SourceUrl).text().null())
                    .col(ColumnDef::new(Videos::ThumbnailUrl).text().null())
                    .col(ColumnDef::new(Videos::Provider).text().not_null())
                    .col(
                        ColumnDef::new(Videos::PublishedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Videos::Checksum).text().not_null())
                    .col(
                        ColumnDef::new(Videos::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Videos::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_videos_match_id")
                            .from(Videos::Table, Videos::MatchId)
                            .to(Matches::Table, Matches::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Listings are always ordered newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_videos_published_at")
                    .table(Videos::Table)
                    .col((Videos::PublishedAt, IndexOrder::Desc))
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_videos_match_id")
                    .table(Videos::Table)
                    .col(Videos::MatchId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_videos_published_at").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_videos_match_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Videos::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Videos {
    Table,
    Id,
    MatchId,
    Title,
    EmbedHtml,
    SourceUrl,
    ThumbnailUrl,
    Provider,
    PublishedAt,
    Checksum,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Matches {
    Table,
    Id,
}
