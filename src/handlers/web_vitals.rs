//! # Web Vitals Handler
//!
//! Accepts browser performance measurements. Metrics are append-only and a
//! repeated id is rejected as a conflict.

use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use utoipa::ToSchema;

use crate::error::{ApiError, validation_error};
use crate::models::web_vital;
use crate::repositories::WebVitalRepository;
use crate::server::AppState;

/// Metric as reported by the browser
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebVitalRequest {
    /// Unique id assigned to the measurement by the reporter
    #[schema(example = "v4-1712345678901-1234567890123")]
    pub id: Option<String>,
    #[schema(example = "LCP")]
    pub name: Option<String>,
    #[schema(example = 1834.2)]
    pub value: Option<f64>,
    #[schema(example = "good")]
    pub rating: Option<String>,
    pub delta: Option<f64>,
    #[schema(example = "navigate")]
    pub navigation_type: Option<String>,
    #[schema(example = "/competitions/premier-league-england")]
    pub page: Option<String>,
}

/// Stored metric acknowledgement
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WebVitalCreated {
    pub id: String,
}

/// Record a web vital metric
#[utoipa::path(
    post,
    path = "/web-vitals",
    request_body = WebVitalRequest,
    responses(
        (status = 201, description = "Metric stored", body = WebVitalCreated),
        (status = 400, description = "Missing or invalid fields", body = ApiError, example = json!({
            "code": "VALIDATION_FAILED",
            "message": "Invalid web vital metric",
            "details": { "value": "required" },
            "trace_id": "corr-12345678"
        })),
        (status = 409, description = "Metric id already recorded", body = ApiError)
    ),
    tag = "telemetry"
)]
pub async fn record_web_vital(
    State(state): State<AppState>,
    body: Result<Json<WebVitalRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<WebVitalCreated>), ApiError> {
    let Json(request) = body?;

    let mut missing = Map::new();
    let id = required_text(request.id, "id", &mut missing);
    let name = required_text(request.name, "name", &mut missing);
    let value = request.value.filter(|value| value.is_finite());
    if value.is_none() {
        missing.insert("value".to_string(), json!("required finite number"));
    }

    let (Some(id), Some(name), Some(value)) = (id, name, value) else {
        return Err(validation_error(
            "Invalid web vital metric",
            Value::Object(missing),
        ));
    };

    let metric = web_vital::ActiveModel {
        id: Set(id),
        name: Set(name),
        value: Set(value),
        rating: Set(request.rating),
        delta: Set(request.delta.filter(|delta| delta.is_finite())),
        navigation_type: Set(request.navigation_type),
        page: Set(request.page),
        created_at: Set(Utc::now().fixed_offset()),
    };

    let stored = WebVitalRepository::new(&state.db).insert(metric).await?;
    tracing::debug!(id = %stored.id, name = %stored.name, "Recorded web vital");

    Ok((StatusCode::CREATED, Json(WebVitalCreated { id: stored.id })))
}

fn required_text(value: Option<String>, field: &str, missing: &mut Map<String, Value>) -> Option<String> {
    let value = value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());
    if value.is_none() {
        missing.insert(field.to_string(), json!("required"));
    }
    value
}
