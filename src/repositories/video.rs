//! # Video Repository
//!
//! Content-addressed video rows plus the joined, newest-first listing
//! queries used by the read API.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, IntoActiveModel, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Select, Set,
    prelude::DateTimeWithTimeZone,
    sea_query::{Alias, Expr, OnConflict, SimpleExpr},
};

use crate::models::{
    competition, matches, team,
    video::{self, Entity as Video},
};

const HOME_TEAM: &str = "home_team";
const AWAY_TEAM: &str = "away_team";

/// Values written for one video
#[derive(Debug, Clone)]
pub struct VideoUpsert {
    pub id: String,
    pub match_id: i32,
    pub title: String,
    pub embed_html: String,
    pub source_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub provider: String,
    pub published_at: DateTimeWithTimeZone,
    pub checksum: String,
}

/// What an upsert did to the stored row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoWrite {
    Inserted,
    Updated,
    Unchanged,
}

/// Which videos a listing covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoScope {
    All,
    Competition(i32),
    Team(i32),
}

/// A video joined with its match, competition and teams
#[derive(Debug, Clone, FromQueryResult)]
pub struct VideoRow {
    pub id: String,
    pub title: String,
    pub embed_html: String,
    pub source_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub provider: String,
    pub published_at: DateTimeWithTimeZone,
    pub match_id: i32,
    pub match_title: String,
    pub competition_slug: String,
    pub competition_name: String,
    pub home_team_slug: String,
    pub home_team_name: String,
    pub away_team_slug: String,
    pub away_team_name: String,
}

/// Repository for video database operations
pub struct VideoRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> VideoRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<video::Model>, DbErr> {
        Video::find_by_id(id.to_string()).one(self.db).await
    }

    /// Insert the video, or rewrite it when its checksum changed.
    pub async fn upsert(&self, values: VideoUpsert) -> Result<VideoWrite, DbErr> {
        let now = Utc::now().fixed_offset();

        if let Some(existing) = self.find_by_id(&values.id).await? {
            if existing.checksum == values.checksum {
                return Ok(VideoWrite::Unchanged);
            }

            let mut model = existing.into_active_model();
            model.match_id = Set(values.match_id);
            model.title = Set(values.title);
            model.embed_html = Set(values.embed_html);
            model.source_url = Set(values.source_url);
            model.thumbnail_url = Set(values.thumbnail_url);
            model.checksum = Set(values.checksum);
            model.updated_at = Set(now);
            model.update(self.db).await?;
            return Ok(VideoWrite::Updated);
        }

        let model = video::ActiveModel {
            id: Set(values.id),
            match_id: Set(values.match_id),
            title: Set(values.title),
            embed_html: Set(values.embed_html),
            source_url: Set(values.source_url),
            thumbnail_url: Set(values.thumbnail_url),
            provider: Set(values.provider),
            published_at: Set(values.published_at),
            checksum: Set(values.checksum),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = Video::insert(model)
            .on_conflict(OnConflict::column(video::Column::Id).do_nothing().to_owned())
            .exec_without_returning(self.db)
            .await?;

        // Zero rows means a concurrent writer stored the same content first
        Ok(if inserted == 0 {
            VideoWrite::Unchanged
        } else {
            VideoWrite::Inserted
        })
    }

    /// One page of videos, newest first with id as tie-breaker.
    pub async fn list_page(
        &self,
        scope: VideoScope,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<VideoRow>, DbErr> {
        scoped(scope)
            .select_only()
            .columns([
                video::Column::Id,
                video::Column::Title,
                video::Column::EmbedHtml,
                video::Column::SourceUrl,
                video::Column::ThumbnailUrl,
                video::Column::Provider,
                video::Column::PublishedAt,
                video::Column::MatchId,
            ])
            .column_as(matches::Column::Title, "match_title")
            .join(JoinType::InnerJoin, matches::Relation::Competition.def())
            .column_as(competition::Column::Slug, "competition_slug")
            .column_as(competition::Column::Name, "competition_name")
            .join_as(
                JoinType::InnerJoin,
                matches::Relation::HomeTeam.def(),
                Alias::new(HOME_TEAM),
            )
            .column_as(aliased(HOME_TEAM, team::Column::Slug), "home_team_slug")
            .column_as(aliased(HOME_TEAM, team::Column::Name), "home_team_name")
            .join_as(
                JoinType::InnerJoin,
                matches::Relation::AwayTeam.def(),
                Alias::new(AWAY_TEAM),
            )
            .column_as(aliased(AWAY_TEAM, team::Column::Slug), "away_team_slug")
            .column_as(aliased(AWAY_TEAM, team::Column::Name), "away_team_name")
            .order_by_desc(video::Column::PublishedAt)
            .order_by_desc(video::Column::Id)
            .offset(offset)
            .limit(limit)
            .into_model::<VideoRow>()
            .all(self.db)
            .await
    }

    /// Total number of videos in `scope`
    pub async fn count(&self, scope: VideoScope) -> Result<u64, DbErr> {
        scoped(scope).count(self.db).await
    }
}

fn scoped(scope: VideoScope) -> Select<Video> {
    let query = Video::find().join(JoinType::InnerJoin, video::Relation::Match.def());
    match scope {
        VideoScope::All => query,
        VideoScope::Competition(competition_id) => {
            query.filter(matches::Column::CompetitionId.eq(competition_id))
        }
        VideoScope::Team(team_id) => query.filter(
            Condition::any()
                .add(matches::Column::HomeTeamId.eq(team_id))
                .add(matches::Column::AwayTeamId.eq(team_id)),
        ),
    }
}

fn aliased(alias: &str, column: team::Column) -> SimpleExpr {
    Expr::col((Alias::new(alias), column)).into()
}
