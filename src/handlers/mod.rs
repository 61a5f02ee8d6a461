//! # API Handlers
//!
//! HTTP endpoint handlers for the highlights API.

pub mod cache;
pub mod catalog;
pub mod ingest;
pub mod types;
pub mod videos;
pub mod web_vitals;

use axum::{extract::State, response::Json};

use crate::db;
use crate::error::{ApiError, ErrorType};
use crate::models::ServiceInfo;
use crate::server::AppState;
use types::HealthResponse;

/// Root handler that returns basic service information
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service information", body = ServiceInfo)
    ),
    tag = "root"
)]
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo::default())
}

/// Liveness and database readiness probe
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and database are healthy", body = HealthResponse),
        (status = 503, description = "Database unavailable", body = ApiError)
    ),
    tag = "root"
)]
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    if let Err(err) = db::health_check(&state.db).await {
        tracing::warn!(error = %err, "Health check failed");
        return Err(ApiError::from(ErrorType::ServiceUnavailable)
            .with_details(serde_json::json!({ "database": "unavailable" })));
    }

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        database: "ok".to_string(),
        cache: state.cache.backend_name().to_string(),
    }))
}

/// Problem+json 404 for routes that do not exist
pub async fn fallback() -> ApiError {
    ErrorType::NotFound.into()
}

#[cfg(test)]
mod tests;
