//! Match entity model
//!
//! A match is identified by the feed's external id and links two teams to a
//! competition. Videos hang off matches.

use std::fmt;

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

/// Match entity
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "matches")]
pub struct Model {
    /// Surrogate identifier (primary key)
    #[sea_orm(primary_key)]
    pub id: i32,

    /// External identity reported by the feed (or its match-view URL)
    #[sea_orm(unique)]
    pub ext_id: String,

    /// Home side
    pub home_team_id: i32,

    /// Away side
    pub away_team_id: i32,

    /// Competition the match belongs to
    pub competition_id: i32,

    /// Kick-off or publication date reported by the feed
    pub match_date: Option<DateTimeWithTimeZone>,

    /// Display title, e.g. "Arsenal - Chelsea"
    pub title: String,

    /// Lifecycle status, one of [`MatchStatus`]
    pub status: String,

    /// Timestamp when the match was created
    pub created_at: DateTimeWithTimeZone,

    /// Timestamp when the match was last updated
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::competition::Entity",
        from = "Column::CompetitionId",
        to = "super::competition::Column::Id"
    )]
    Competition,
    #[sea_orm(
        belongs_to = "super::team::Entity",
        from = "Column::HomeTeamId",
        to = "super::team::Column::Id"
    )]
    HomeTeam,
    #[sea_orm(
        belongs_to = "super::team::Entity",
        from = "Column::AwayTeamId",
        to = "super::team::Column::Id"
    )]
    AwayTeam,
    #[sea_orm(has_many = "super::video::Entity")]
    Videos,
}

impl Related<super::competition::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Competition.def()
    }
}

impl Related<super::video::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Videos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Lifecycle of a match as stored in the `status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchStatus {
    Scheduled,
    Live,
    Finished,
}

impl MatchStatus {
    /// Return the canonical string representation for this status.
    pub const fn as_str(self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::Live => "live",
            MatchStatus::Finished => "finished",
        }
    }

    /// Parse a stored status value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "scheduled" => Some(MatchStatus::Scheduled),
            "live" => Some(MatchStatus::Live),
            "finished" => Some(MatchStatus::Finished),
            _ => None,
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_column_value() {
        for status in [
            MatchStatus::Scheduled,
            MatchStatus::Live,
            MatchStatus::Finished,
        ] {
            assert_eq!(MatchStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(MatchStatus::parse("postponed"), None);
    }
}
