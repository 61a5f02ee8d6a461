//! # Video Listing Handlers
//!
//! Paginated, newest-first video listings: global, per competition and
//! per team.

use axum::{
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    response::Json,
};

use crate::error::ApiError;
use crate::handlers::types::PageQuery;
use crate::listing::{Page, VideoSummary};
use crate::server::AppState;

/// List all videos
#[utoipa::path(
    get,
    path = "/videos",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of videos", body = Page<VideoSummary>),
        (status = 400, description = "Malformed query parameters", body = ApiError),
        (status = 503, description = "Database unavailable", body = ApiError)
    ),
    tag = "videos"
)]
pub async fn list_videos(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<Page<VideoSummary>>, ApiError> {
    let Query(query) = query?;
    let page = state.listing.list(query.into()).await?;
    Ok(Json(page))
}

/// List videos of one competition
#[utoipa::path(
    get,
    path = "/competitions/{slug}/videos",
    params(
        ("slug" = String, Path, description = "Competition slug, e.g. premier-league-england"),
        PageQuery
    ),
    responses(
        (status = 200, description = "One page of videos", body = Page<VideoSummary>),
        (status = 400, description = "Malformed query parameters", body = ApiError),
        (status = 404, description = "Unknown competition", body = ApiError)
    ),
    tag = "videos"
)]
pub async fn list_competition_videos(
    State(state): State<AppState>,
    slug: Result<Path<String>, PathRejection>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<Page<VideoSummary>>, ApiError> {
    let Path(slug) = slug?;
    let Query(query) = query?;
    let page = state
        .listing
        .list_for_competition(&slug, query.into())
        .await?;
    Ok(Json(page))
}

/// List videos of one team, home or away
#[utoipa::path(
    get,
    path = "/teams/{slug}/videos",
    params(
        ("slug" = String, Path, description = "Team slug, e.g. arsenal"),
        PageQuery
    ),
    responses(
        (status = 200, description = "One page of videos", body = Page<VideoSummary>),
        (status = 400, description = "Malformed query parameters", body = ApiError),
        (status = 404, description = "Unknown team", body = ApiError)
    ),
    tag = "videos"
)]
pub async fn list_team_videos(
    State(state): State<AppState>,
    slug: Result<Path<String>, PathRejection>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<Page<VideoSummary>>, ApiError> {
    let Path(slug) = slug?;
    let Query(query) = query?;
    let page = state.listing.list_for_team(&slug, query.into()).await?;
    Ok(Json(page))
}
