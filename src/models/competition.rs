//! Competition entity model
//!
//! Competitions form a curated catalogue: ingestion only links matches to
//! competitions that already exist.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

/// Competition entity (league, cup or tournament)
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "competitions")]
pub struct Model {
    /// Surrogate identifier (primary key)
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Unique slug derived from name and country
    #[sea_orm(unique)]
    pub slug: String,

    /// Display name, e.g. "Premier League"
    pub name: String,

    /// Optional country, e.g. "England"
    pub country: Option<String>,

    /// Timestamp when the competition was created
    pub created_at: DateTimeWithTimeZone,

    /// Timestamp when the competition was last updated
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
