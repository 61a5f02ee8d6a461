//! # Web Vital Repository
//!
//! Append-only storage for browser performance metrics.

use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr};

use crate::models::web_vital;

pub struct WebVitalRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> WebVitalRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert a metric; a duplicate id surfaces as a unique violation.
    pub async fn insert(&self, metric: web_vital::ActiveModel) -> Result<web_vital::Model, DbErr> {
        metric.insert(self.db).await
    }
}
