//! # Common API Types
//!
//! Request and response shapes shared by several handlers.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::listing::PageParams;

/// Pagination query parameters for listing endpoints
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number; values below 1 are treated as 1
    pub page: Option<i64>,
    /// Page size (default: 20, clamped to 1..=50)
    pub limit: Option<i64>,
}

impl From<PageQuery> for PageParams {
    fn from(query: PageQuery) -> Self {
        PageParams::from_query(query.page, query.limit)
    }
}

/// Health probe response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Overall status, `ok` when every dependency answered
    #[schema(example = "ok")]
    pub status: String,
    /// Database status
    #[schema(example = "ok")]
    pub database: String,
    /// Active cache backend (`redis`, `memory` or `disabled`)
    #[schema(example = "memory")]
    pub cache: String,
}
