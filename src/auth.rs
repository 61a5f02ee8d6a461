//! # Authentication
//!
//! Shared-secret authentication for the administrative endpoints
//! (ingestion trigger, catalogue writes, cache flush).

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use utoipa::IntoParams;

use crate::config::AppConfig;
use crate::error::{ApiError, unauthorized};
use crate::server::AppState;

/// Header carrying the admin secret
pub const ADMIN_SECRET_HEADER: &str = "x-admin-secret";

/// Marker type for authenticated admin requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminAuth;

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        Arc::clone(&app_state.config)
    }
}

/// Middleware rejecting requests without the configured admin secret
pub async fn admin_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    verify_admin_secret(&config, request.headers())?;
    tracing::debug!("Authenticated admin request");

    request.extensions_mut().insert(AdminAuth);
    Ok(next.run(request).await)
}

fn verify_admin_secret(config: &AppConfig, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(expected) = config.admin_secret.as_deref().filter(|s| !s.is_empty()) else {
        tracing::warn!("Admin endpoint called but no admin secret is configured");
        return Err(unauthorized(Some("Admin access is not configured")));
    };

    let provided = headers
        .get(ADMIN_SECRET_HEADER)
        .ok_or_else(|| unauthorized(Some("Missing X-Admin-Secret header")))?
        .to_str()
        .map_err(|_| unauthorized(Some("Invalid X-Admin-Secret header")))?;

    if bool::from(provided.as_bytes().ct_eq(expected.as_bytes())) {
        Ok(())
    } else {
        Err(unauthorized(Some("Invalid admin secret")))
    }
}

/// OpenAPI header parameter for X-Admin-Secret
#[derive(Debug, Serialize, Deserialize, IntoParams, utoipa::ToSchema)]
#[into_params(parameter_in = Header)]
pub struct AdminSecretHeader {
    /// Shared secret configured through HIGHLIGHTS_ADMIN_SECRET
    #[serde(rename = "X-Admin-Secret")]
    #[param(rename = "X-Admin-Secret", value_type = String)]
    pub admin_secret: String,
}

impl<S> FromRequestParts<S> for AdminAuth
where
    S: Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AdminAuth>()
            .copied()
            .ok_or_else(|| unauthorized(Some("Admin authentication required")))
    }
}
