//! Entity mapper: resolves feed names to stored teams and competitions.
//!
//! Teams are created on demand. Competitions form a curated catalogue, so
//! lookups never create them; only [`EntityMapper::ensure_competition`]
//! (seeding and the admin API) does.

use sea_orm::{DatabaseConnection, DbErr};
use tracing::debug;

use crate::models::{competition, team};
use crate::repositories::{CompetitionRepository, TeamRepository};
use crate::slug::{slugify, slugify_parts};

/// Competition name as reported by the feed, split into name and country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompetitionName {
    pub name: String,
    pub country: Option<String>,
}

impl CompetitionName {
    /// Parse `"ENGLAND: Premier League"` into country `ENGLAND` and name
    /// `Premier League`. Text without a `": "` separator is a bare name.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.split_once(": ") {
            Some((country, name)) if !country.trim().is_empty() && !name.trim().is_empty() => {
                Self {
                    name: name.trim().to_string(),
                    country: Some(country.trim().to_string()),
                }
            }
            _ => Self {
                name: raw.to_string(),
                country: None,
            },
        }
    }

    /// Slug the catalogue stores this competition under.
    pub fn slug(&self) -> String {
        competition_slug(&self.name, self.country.as_deref())
    }
}

/// Slug for a competition with an optional country.
pub fn competition_slug(name: &str, country: Option<&str>) -> String {
    slugify_parts(&[name, country.unwrap_or_default()])
}

/// Maps display names onto persisted entities.
#[derive(Clone, Copy)]
pub struct EntityMapper<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> EntityMapper<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Return the team for `name`, creating or refreshing it as needed.
    pub async fn ensure_team(
        &self,
        name: &str,
        country: Option<&str>,
    ) -> Result<team::Model, DbErr> {
        let name = name.trim();
        let slug = slugify(name);
        debug!(%slug, "Ensuring team");
        TeamRepository::new(self.db)
            .upsert_by_slug(&slug, name, country)
            .await
    }

    /// Look up an existing competition; never creates one.
    ///
    /// Tries an exact name/country match first, then the derived slug so
    /// that case or punctuation differences still resolve.
    pub async fn find_competition_by_name(
        &self,
        name: &str,
        country: Option<&str>,
    ) -> Result<Option<competition::Model>, DbErr> {
        let repo = CompetitionRepository::new(self.db);
        let name = name.trim();
        let country = country.map(str::trim).filter(|country| !country.is_empty());

        if let Some(found) = repo.find_by_name_and_country(name, country).await? {
            return Ok(Some(found));
        }

        repo.find_by_slug(&competition_slug(name, country)).await
    }

    /// Return the competition for `name`/`country`, creating it if absent.
    pub async fn ensure_competition(
        &self,
        name: &str,
        country: Option<&str>,
    ) -> Result<competition::Model, DbErr> {
        let name = name.trim();
        let country = country.map(str::trim).filter(|country| !country.is_empty());
        let slug = competition_slug(name, country);
        debug!(%slug, "Ensuring competition");
        CompetitionRepository::new(self.db)
            .upsert_by_slug(&slug, name, country)
            .await
    }
}
