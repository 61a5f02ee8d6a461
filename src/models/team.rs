//! Team entity model
//!
//! Teams are created on demand during ingestion and identified by a slug
//! derived from their display name.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

/// Team entity representing a football club or national side
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "teams")]
pub struct Model {
    /// Surrogate identifier (primary key)
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Unique slug derived from the team name
    #[sea_orm(unique)]
    pub slug: String,

    /// Display name as last reported by the feed
    pub name: String,

    /// Optional country of the team
    pub country: Option<String>,

    /// Timestamp when the team was created
    pub created_at: DateTimeWithTimeZone,

    /// Timestamp when the team was last updated
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
