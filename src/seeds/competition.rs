//! Competition seeding functionality

use anyhow::Result;
use sea_orm::DatabaseConnection;

use crate::mapping::{EntityMapper, competition_slug};
use crate::repositories::CompetitionRepository;

/// Well-known competitions as `(name, country)`
pub const DEFAULT_COMPETITIONS: &[(&str, &str)] = &[
    ("Premier League", "England"),
    ("Championship", "England"),
    ("FA Cup", "England"),
    ("La Liga", "Spain"),
    ("Serie A", "Italy"),
    ("Bundesliga", "Germany"),
    ("Ligue 1", "France"),
    ("Eredivisie", "Netherlands"),
    ("Liga Portugal", "Portugal"),
    ("Champions League", "Europe"),
    ("Europa League", "Europe"),
    ("Conference League", "Europe"),
];

/// Seeds the competitions table with [`DEFAULT_COMPETITIONS`].
///
/// Existing rows are left untouched so names edited through the API survive
/// restarts. Returns the number of competitions created.
pub async fn seed_competitions(db: &DatabaseConnection) -> Result<usize> {
    let repo = CompetitionRepository::new(db);
    let mapper = EntityMapper::new(db);
    let mut created = 0;

    for (name, country) in DEFAULT_COMPETITIONS {
        let slug = competition_slug(name, Some(country));
        if repo.find_by_slug(&slug).await?.is_some() {
            log::debug!("Competition '{}' already exists, skipping", slug);
            continue;
        }

        log::info!("Creating competition: {}", slug);
        mapper.ensure_competition(name, Some(country)).await?;
        created += 1;
    }

    log::info!("Competition seeding completed ({} created)", created);
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let first = seed_competitions(&db).await.unwrap();
        let second = seed_competitions(&db).await.unwrap();

        assert_eq!(first, DEFAULT_COMPETITIONS.len());
        assert_eq!(second, 0);

        let premier_league = CompetitionRepository::new(&db)
            .find_by_slug("premier-league-england")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(premier_league.country.as_deref(), Some("England"));
    }
}
