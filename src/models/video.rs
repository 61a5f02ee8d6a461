//! Video entity model
//!
//! Videos are identified by the hex SHA-256 of the raw feed object they were
//! ingested from, so re-ingesting identical data never creates new rows.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

/// Video entity representing one embeddable highlight clip
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "videos")]
pub struct Model {
    /// Content-hash identifier (64 hex characters)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owning match
    pub match_id: i32,

    /// Clip title, e.g. "Highlights"
    pub title: String,

    /// Provider-supplied embed markup
    pub embed_html: String,

    /// Page the clip was published on
    pub source_url: Option<String>,

    /// Preview image
    pub thumbnail_url: Option<String>,

    /// Feed the clip came from
    pub provider: String,

    /// Publication timestamp used for listing order
    pub published_at: DateTimeWithTimeZone,

    /// Hex SHA-256 of the persisted fields, used to skip no-op rewrites
    pub checksum: String,

    /// Timestamp when the video was created
    pub created_at: DateTimeWithTimeZone,

    /// Timestamp when the video was last updated
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::matches::Entity",
        from = "Column::MatchId",
        to = "super::matches::Column::Id"
    )]
    Match,
}

impl Related<super::matches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Match.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
