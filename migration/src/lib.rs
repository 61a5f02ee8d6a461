//! Database migrations for the highlights service.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2025_01_10_000001_create_teams;
mod m2025_01_10_000002_create_competitions;
mod m2025_01_10_000003_create_matches;
mod m2025_01_10_000004_create_videos;
mod m2025_02_03_000001_create_web_vital_metrics;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2025_01_10_000001_create_teams::Migration),
            Box::new(m2025_01_10_000002_create_competitions::Migration),
            Box::new(m2025_01_10_000003_create_matches::Migration),
            Box::new(m2025_01_10_000004_create_videos::Migration),
            Box::new(m2025_02_03_000001_create_web_vital_metrics::Migration),
        ]
    }
}
