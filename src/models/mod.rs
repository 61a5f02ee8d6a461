//! # Data Models
//!
//! This module contains all the data models used throughout the highlights service.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod competition;
pub mod matches;
pub mod team;
pub mod video;
pub mod web_vital;

pub use competition::Entity as Competition;
pub use matches::Entity as Match;
pub use team::Entity as Team;
pub use video::Entity as Video;
pub use web_vital::Entity as WebVitalMetric;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "highlights".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
