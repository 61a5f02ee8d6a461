//! # Competition Repository
//!
//! Access to the curated `competitions` catalogue.

use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::OnConflict,
};

use crate::models::competition::{self, Entity as Competition};

/// Repository for competition database operations
pub struct CompetitionRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CompetitionRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<competition::Model>, DbErr> {
        Competition::find()
            .filter(competition::Column::Slug.eq(slug))
            .one(self.db)
            .await
    }

    /// Exact match on display name and country (`IS NULL` when `country` is `None`)
    pub async fn find_by_name_and_country(
        &self,
        name: &str,
        country: Option<&str>,
    ) -> Result<Option<competition::Model>, DbErr> {
        let query = Competition::find().filter(competition::Column::Name.eq(name));
        let query = match country {
            Some(country) => query.filter(competition::Column::Country.eq(country)),
            None => query.filter(competition::Column::Country.is_null()),
        };
        query.order_by_asc(competition::Column::Id).one(self.db).await
    }

    pub async fn list_all(&self) -> Result<Vec<competition::Model>, DbErr> {
        Competition::find()
            .order_by_asc(competition::Column::Name)
            .order_by_asc(competition::Column::Id)
            .all(self.db)
            .await
    }

    /// Insert or update the competition identified by `slug`.
    pub async fn upsert_by_slug(
        &self,
        slug: &str,
        name: &str,
        country: Option<&str>,
    ) -> Result<competition::Model, DbErr> {
        let now = Utc::now().fixed_offset();
        let model = competition::ActiveModel {
            slug: Set(slug.to_string()),
            name: Set(name.to_string()),
            country: Set(country.map(str::to_string)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        Competition::insert(model)
            .on_conflict(
                OnConflict::column(competition::Column::Slug)
                    .update_columns([
                        competition::Column::Name,
                        competition::Column::Country,
                        competition::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        self.find_by_slug(slug)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("competition '{slug}'")))
    }
}
