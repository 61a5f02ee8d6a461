//! # Team Repository
//!
//! Slug-keyed access to the `teams` table.

use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::OnConflict,
};

use crate::models::team::{self, Entity as Team};

/// Repository for team database operations
pub struct TeamRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TeamRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<team::Model>, DbErr> {
        Team::find()
            .filter(team::Column::Slug.eq(slug))
            .one(self.db)
            .await
    }

    /// All teams ordered by display name
    pub async fn list_all(&self) -> Result<Vec<team::Model>, DbErr> {
        Team::find()
            .order_by_asc(team::Column::Name)
            .order_by_asc(team::Column::Id)
            .all(self.db)
            .await
    }

    /// Insert or update the team identified by `slug`.
    ///
    /// The write is a single `INSERT .. ON CONFLICT (slug) DO UPDATE`, so
    /// concurrent callers converge on one row.
    pub async fn upsert_by_slug(
        &self,
        slug: &str,
        name: &str,
        country: Option<&str>,
    ) -> Result<team::Model, DbErr> {
        let now = Utc::now().fixed_offset();
        let model = team::ActiveModel {
            slug: Set(slug.to_string()),
            name: Set(name.to_string()),
            country: Set(country.map(str::to_string)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        Team::insert(model)
            .on_conflict(
                OnConflict::column(team::Column::Slug)
                    .update_columns([
                        team::Column::Name,
                        team::Column::Country,
                        team::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        self.find_by_slug(slug)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("team '{slug}'")))
    }
}
