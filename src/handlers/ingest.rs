//! # Ingestion Endpoint Handler
//!
//! `POST /ingest` runs one ingestion pass synchronously and returns its
//! record counts.

use axum::{extract::State, response::Json};

use crate::auth::{AdminAuth, AdminSecretHeader};
use crate::error::ApiError;
use crate::ingestion::IngestReport;
use crate::server::AppState;

/// Trigger an ingestion run
#[utoipa::path(
    post,
    path = "/ingest",
    params(AdminSecretHeader),
    responses(
        (status = 200, description = "Run finished", body = IngestReport, example = json!({
            "created": 12,
            "updated": 3,
            "skipped": 41
        })),
        (status = 401, description = "Missing or invalid admin secret", body = ApiError),
        (status = 502, description = "Feed unavailable or returned an invalid payload", body = ApiError, example = json!({
            "code": "PROVIDER_ERROR",
            "message": "Provider scorebat returned error status 503",
            "details": {
                "provider": "scorebat",
                "status": 503,
                "body_snippet": "Service temporarily unavailable"
            },
            "trace_id": "corr-44444444"
        })),
        (status = 503, description = "Database unavailable", body = ApiError)
    ),
    tag = "ingestion"
)]
pub async fn trigger_ingest(
    State(state): State<AppState>,
    _admin: AdminAuth,
) -> Result<Json<IngestReport>, ApiError> {
    let report = state.pipeline.run().await?;
    Ok(Json(report))
}
