//! # Catalogue Handlers
//!
//! Competition and team listings, plus the admin path for adding
//! competitions to the catalogue ingestion resolves against.

use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{AdminAuth, AdminSecretHeader};
use crate::error::{ApiError, validation_error};
use crate::mapping::EntityMapper;
use crate::models::{competition, team};
use crate::repositories::{CompetitionRepository, TeamRepository};
use crate::server::AppState;

/// Competition information for API responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CompetitionInfo {
    #[schema(example = "premier-league-england")]
    pub slug: String,
    #[schema(example = "Premier League")]
    pub name: String,
    #[schema(example = "England")]
    pub country: Option<String>,
}

impl From<competition::Model> for CompetitionInfo {
    fn from(model: competition::Model) -> Self {
        Self {
            slug: model.slug,
            name: model.name,
            country: model.country,
        }
    }
}

/// Team information for API responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TeamInfo {
    #[schema(example = "arsenal")]
    pub slug: String,
    #[schema(example = "Arsenal")]
    pub name: String,
    pub country: Option<String>,
}

impl From<team::Model> for TeamInfo {
    fn from(model: team::Model) -> Self {
        Self {
            slug: model.slug,
            name: model.name,
            country: model.country,
        }
    }
}

/// Request body for adding a competition
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCompetitionRequest {
    #[schema(example = "Premier League")]
    pub name: String,
    #[schema(example = "England")]
    pub country: Option<String>,
}

/// List all competitions ordered by name
#[utoipa::path(
    get,
    path = "/competitions",
    responses(
        (status = 200, description = "Competition catalogue", body = [CompetitionInfo]),
        (status = 503, description = "Database unavailable", body = ApiError)
    ),
    tag = "catalog"
)]
pub async fn list_competitions(
    State(state): State<AppState>,
) -> Result<Json<Vec<CompetitionInfo>>, ApiError> {
    let competitions = CompetitionRepository::new(&state.db).list_all().await?;
    Ok(Json(
        competitions.into_iter().map(CompetitionInfo::from).collect(),
    ))
}

/// Add a competition to the catalogue (idempotent)
#[utoipa::path(
    post,
    path = "/competitions",
    params(AdminSecretHeader),
    request_body = CreateCompetitionRequest,
    responses(
        (status = 201, description = "Competition stored", body = CompetitionInfo),
        (status = 400, description = "Invalid request body", body = ApiError),
        (status = 401, description = "Missing or invalid admin secret", body = ApiError)
    ),
    tag = "catalog"
)]
pub async fn create_competition(
    State(state): State<AppState>,
    _admin: AdminAuth,
    body: Result<Json<CreateCompetitionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CompetitionInfo>), ApiError> {
    let Json(request) = body?;

    if request.name.trim().is_empty() {
        return Err(validation_error(
            "Invalid competition",
            serde_json::json!({ "name": "must not be blank" }),
        ));
    }

    let stored = EntityMapper::new(&state.db)
        .ensure_competition(&request.name, request.country.as_deref())
        .await?;
    tracing::info!(slug = %stored.slug, "Competition stored");

    Ok((StatusCode::CREATED, Json(stored.into())))
}

/// List all teams ordered by name
#[utoipa::path(
    get,
    path = "/teams",
    responses(
        (status = 200, description = "Known teams", body = [TeamInfo]),
        (status = 503, description = "Database unavailable", body = ApiError)
    ),
    tag = "catalog"
)]
pub async fn list_teams(State(state): State<AppState>) -> Result<Json<Vec<TeamInfo>>, ApiError> {
    let teams = TeamRepository::new(&state.db).list_all().await?;
    Ok(Json(teams.into_iter().map(TeamInfo::from).collect()))
}
