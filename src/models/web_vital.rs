//! Web vital metric entity model
//!
//! Append-only telemetry records reported by the browser.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "web_vital_metrics")]
pub struct Model {
    /// Client-assigned metric id (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Metric name, e.g. "LCP" or "CLS"
    pub name: String,

    pub value: f64,

    pub rating: Option<String>,

    pub delta: Option<f64>,

    pub navigation_type: Option<String>,

    /// Page path the metric was captured on
    pub page: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
