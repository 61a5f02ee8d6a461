//! # Match Repository
//!
//! Matches are keyed by the external id reported by the feed.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, Set, prelude::DateTimeWithTimeZone, sea_query::OnConflict,
};

use crate::models::matches::{self, Entity as Match, MatchStatus};

/// Values written for one match
#[derive(Debug, Clone)]
pub struct MatchUpsert {
    pub ext_id: String,
    pub title: String,
    pub home_team_id: i32,
    pub away_team_id: i32,
    pub competition_id: i32,
    pub match_date: Option<DateTimeWithTimeZone>,
    pub status: MatchStatus,
}

/// Repository for match database operations
pub struct MatchRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> MatchRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_ext_id(&self, ext_id: &str) -> Result<Option<matches::Model>, DbErr> {
        Match::find()
            .filter(matches::Column::ExtId.eq(ext_id))
            .one(self.db)
            .await
    }

    /// Update the match with `ext_id`, or insert it.
    ///
    /// Returns the stored row and whether it existed before the call. A
    /// missing `match_date` never clears a stored one.
    pub async fn upsert(&self, values: MatchUpsert) -> Result<(matches::Model, bool), DbErr> {
        let now = Utc::now().fixed_offset();

        if let Some(existing) = self.find_by_ext_id(&values.ext_id).await? {
            let mut model = existing.into_active_model();
            model.title = Set(values.title);
            model.status = Set(values.status.as_str().to_string());
            model.home_team_id = Set(values.home_team_id);
            model.away_team_id = Set(values.away_team_id);
            model.competition_id = Set(values.competition_id);
            if let Some(date) = values.match_date {
                model.match_date = Set(Some(date));
            }
            model.updated_at = Set(now);
            let updated = model.update(self.db).await?;
            return Ok((updated, true));
        }

        let ext_id = values.ext_id.clone();
        let model = matches::ActiveModel {
            ext_id: Set(values.ext_id),
            home_team_id: Set(values.home_team_id),
            away_team_id: Set(values.away_team_id),
            competition_id: Set(values.competition_id),
            match_date: Set(values.match_date),
            title: Set(values.title),
            status: Set(values.status.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        // A concurrent run may have inserted the same ext_id since the lookup
        Match::insert(model)
            .on_conflict(
                OnConflict::column(matches::Column::ExtId)
                    .update_columns([
                        matches::Column::Title,
                        matches::Column::Status,
                        matches::Column::HomeTeamId,
                        matches::Column::AwayTeamId,
                        matches::Column::CompetitionId,
                        matches::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        let inserted = self
            .find_by_ext_id(&ext_id)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("match '{ext_id}'")))?;
        Ok((inserted, false))
    }
}
