//! # Cache Administration Handler

use axum::{
    extract::{Query, State, rejection::QueryRejection},
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::{AdminAuth, AdminSecretHeader};
use crate::error::ApiError;
use crate::server::AppState;

/// Query parameters for flushing the cache
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FlushQuery {
    /// Glob pattern (`*`, `?`) of keys to remove; all keys when absent
    pub pattern: Option<String>,
}

/// Flush result
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FlushResponse {
    /// Number of keys removed
    pub flushed: u64,
}

/// Remove cached listing pages
#[utoipa::path(
    delete,
    path = "/cache",
    params(AdminSecretHeader, FlushQuery),
    responses(
        (status = 200, description = "Keys removed", body = FlushResponse),
        (status = 401, description = "Missing or invalid admin secret", body = ApiError)
    ),
    tag = "admin"
)]
pub async fn flush_cache(
    State(state): State<AppState>,
    _admin: AdminAuth,
    query: Result<Query<FlushQuery>, QueryRejection>,
) -> Result<Json<FlushResponse>, ApiError> {
    let Query(query) = query?;
    let pattern = query.pattern.as_deref().filter(|pattern| !pattern.is_empty());
    let flushed = state.cache.flush(pattern).await;
    Ok(Json(FlushResponse { flushed }))
}
