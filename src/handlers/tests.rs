//! # Tests for Handlers
//!
//! Unit tests for the root and health handlers.

use crate::handlers::{fallback, root};
use crate::models::ServiceInfo;
use axum::response::Json;

#[tokio::test]
async fn test_root_handler_returns_expected_service_info() {
    let Json(service_info) = root().await;

    assert_eq!(service_info.service, "highlights");
    assert_eq!(service_info.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_service_info_serializes() {
    let info = ServiceInfo::default();
    let json = serde_json::to_value(&info).unwrap();

    assert_eq!(json["service"], "highlights");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_fallback_is_problem_json_not_found() {
    use axum::{http::StatusCode, response::IntoResponse};

    let response = fallback().await.into_response();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/problem+json"
    );
}
