//! Paginated, cache-first video listings.

use std::time::Duration;

use sea_orm::{DatabaseConnection, DbErr};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use utoipa::ToSchema;

use crate::cache::Cache;
use crate::repositories::{
    CompetitionRepository, TeamRepository, VideoRepository, VideoRow, VideoScope,
};

pub const DEFAULT_LIMIT: u64 = 20;
pub const MAX_LIMIT: u64 = 50;

/// Normalized page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: u64,
    pub limit: u64,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageParams {
    /// Clamp raw query values: `limit` into `1..=50` (default 20) and `page`
    /// to at least 1.
    pub fn from_query(page: Option<i64>, limit: Option<i64>) -> Self {
        let limit = limit.map_or(DEFAULT_LIMIT, |limit| {
            limit.clamp(1, MAX_LIMIT as i64) as u64
        });
        let page = page.map_or(1, |page| page.max(1) as u64);
        Self { page, limit }
    }

    /// Rows to skip before this page.
    pub fn skip(&self) -> u64 {
        // Databases bind offsets as signed 64-bit values
        (self.page - 1)
            .saturating_mul(self.limit)
            .min(i64::MAX as u64)
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Page<T> {
    pub page: u64,
    pub limit: u64,
    /// Total number of items across all pages
    pub total: u64,
    pub items: Vec<T>,
}

/// Slug and display name of a team or competition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EntityRef {
    pub slug: String,
    pub name: String,
}

/// Match a video belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MatchRef {
    pub id: i32,
    pub title: String,
}

/// Listing entry for one video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VideoSummary {
    /// Content hash identifying the clip
    pub id: String,
    pub title: String,
    pub embed_html: String,
    pub source_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub provider: String,
    pub published_at: chrono::DateTime<chrono::FixedOffset>,
    #[serde(rename = "match")]
    pub match_ref: MatchRef,
    pub competition: EntityRef,
    pub home_team: EntityRef,
    pub away_team: EntityRef,
}

impl From<VideoRow> for VideoSummary {
    fn from(row: VideoRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            embed_html: row.embed_html,
            source_url: row.source_url,
            thumbnail_url: row.thumbnail_url,
            provider: row.provider,
            published_at: row.published_at,
            match_ref: MatchRef {
                id: row.match_id,
                title: row.match_title,
            },
            competition: EntityRef {
                slug: row.competition_slug,
                name: row.competition_name,
            },
            home_team: EntityRef {
                slug: row.home_team_slug,
                name: row.home_team_name,
            },
            away_team: EntityRef {
                slug: row.away_team_slug,
                name: row.away_team_name,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ListingError {
    #[error("no {scope} with slug '{slug}'")]
    NotFound { scope: &'static str, slug: String },

    #[error(transparent)]
    Database(#[from] DbErr),
}

/// Read path for video listings.
#[derive(Clone)]
pub struct VideoListing {
    db: DatabaseConnection,
    cache: Cache,
    ttl: Duration,
}

impl VideoListing {
    pub fn new(db: DatabaseConnection, cache: Cache, ttl: Duration) -> Self {
        Self { db, cache, ttl }
    }

    /// All videos, newest first.
    pub async fn list(&self, params: PageParams) -> Result<Page<VideoSummary>, ListingError> {
        let key = cache_key("all", params);
        if let Some(page) = self.cache.get(&key).await {
            return Ok(page);
        }
        self.load_and_cache(&key, VideoScope::All, params).await
    }

    /// Videos of matches in the competition with `slug`.
    pub async fn list_for_competition(
        &self,
        slug: &str,
        params: PageParams,
    ) -> Result<Page<VideoSummary>, ListingError> {
        let key = cache_key(&format!("competition:{slug}"), params);
        if let Some(page) = self.cache.get(&key).await {
            return Ok(page);
        }

        let competition = CompetitionRepository::new(&self.db)
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| ListingError::NotFound {
                scope: "competition",
                slug: slug.to_string(),
            })?;

        self.load_and_cache(&key, VideoScope::Competition(competition.id), params)
            .await
    }

    /// Videos of matches the team with `slug` played in, home or away.
    pub async fn list_for_team(
        &self,
        slug: &str,
        params: PageParams,
    ) -> Result<Page<VideoSummary>, ListingError> {
        let key = cache_key(&format!("team:{slug}"), params);
        if let Some(page) = self.cache.get(&key).await {
            return Ok(page);
        }

        let team = TeamRepository::new(&self.db)
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| ListingError::NotFound {
                scope: "team",
                slug: slug.to_string(),
            })?;

        self.load_and_cache(&key, VideoScope::Team(team.id), params)
            .await
    }

    async fn load_and_cache(
        &self,
        key: &str,
        scope: VideoScope,
        params: PageParams,
    ) -> Result<Page<VideoSummary>, ListingError> {
        let repo = VideoRepository::new(&self.db);
        let (rows, total) = tokio::try_join!(
            repo.list_page(scope, params.skip(), params.limit),
            repo.count(scope),
        )?;

        let page = Page {
            page: params.page,
            limit: params.limit,
            total,
            items: rows.into_iter().map(VideoSummary::from).collect(),
        };

        debug!(key, total, "Loaded video page from database");
        self.cache.set(key, &page, Some(self.ttl)).await;
        Ok(page)
    }
}

/// Cache key for a listing page, e.g. `videos:team:arsenal:page:2:limit:20`.
pub fn cache_key(scope: &str, params: PageParams) -> String {
    format!(
        "videos:{scope}:page:{}:limit:{}",
        params.page, params.limit
    )
}
