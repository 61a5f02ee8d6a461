//! Test utilities for database testing.
//!
//! This module provides utilities for setting up in-memory SQLite databases
//! with migrations applied, plus canned feed sources for ingestion tests.

use anyhow::Result;
use async_trait::async_trait;
use highlights::cache::{CacheError, CacheStore};
use highlights::feed::{FeedError, FeedRecord, FeedSource, parse_payload};
use highlights::mapping::EntityMapper;
use highlights::models::competition;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use serde_json::{Value, json};
use std::time::Duration;

/// Sets up an in-memory SQLite database with all migrations applied.
#[allow(dead_code)]
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// Sets up a file-backed SQLite database under `dir` with a multi-connection
/// pool, so concurrent callers really run on separate connections.
#[allow(dead_code)]
pub async fn setup_file_db(dir: &Path, max_connections: u32) -> Result<DatabaseConnection> {
    let url = format!("sqlite://{}?mode=rwc", dir.join("highlights.db").display());
    let mut options = ConnectOptions::new(url);
    options.max_connections(max_connections).sqlx_logging(false);

    let db = Database::connect(options).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// Inserts a competition into the catalogue.
#[allow(dead_code)]
pub async fn seed_competition(
    db: &DatabaseConnection,
    name: &str,
    country: Option<&str>,
) -> Result<competition::Model> {
    Ok(EntityMapper::new(db)
        .ensure_competition(name, country)
        .await?)
}

/// Feed record JSON in the provider's shape.
#[allow(dead_code)]
pub fn record_json(id: &str, home: &str, away: &str, competition: &str, date: &str) -> Value {
    json!({
        "id": id,
        "title": format!("{home} - {away}"),
        "competition": competition,
        "matchviewUrl": format!("https://feed.example/embed/matchview/{id}"),
        "thumbnail": format!("https://feed.example/thumb/{id}.jpg"),
        "date": date,
        "side1": { "name": home },
        "side2": { "name": away },
        "videos": [
            {
                "id": format!("{id}-v1"),
                "title": "Highlights",
                "embed": format!("<iframe src='https://feed.example/embed/{id}'></iframe>")
            }
        ]
    })
}

/// Three records: one ingestible, one without an away team, one in an
/// unknown competition.
#[allow(dead_code)]
pub fn mixed_payload() -> Value {
    let mut missing_side = record_json(
        "2002",
        "Everton",
        "Chelsea",
        "ENGLAND: Premier League",
        "2026-10-11T14:00:00+0000",
    );
    if let Some(record) = missing_side.as_object_mut() {
        record.remove("side2");
    }

    json!({
        "response": [
            record_json(
                "2001",
                "Arsenal",
                "Liverpool",
                "ENGLAND: Premier League",
                "2026-10-12T16:30:00+0000",
            ),
            missing_side,
            record_json(
                "2003",
                "Boca Juniors",
                "River Plate",
                "ARGENTINA: Liga Profesional",
                "2026-10-12T20:00:00+0000",
            ),
        ]
    })
}

/// Feed source serving a fixed payload.
#[allow(dead_code)]
pub struct StaticFeed {
    records: Vec<FeedRecord>,
}

#[allow(dead_code)]
impl StaticFeed {
    pub fn from_json(payload: &Value) -> Self {
        let body = serde_json::to_vec(payload).unwrap();
        Self {
            records: parse_payload(&body).unwrap(),
        }
    }
}

#[async_trait]
impl FeedSource for StaticFeed {
    fn provider(&self) -> &str {
        "static"
    }

    async fn fetch(&self) -> Result<Vec<FeedRecord>, FeedError> {
        Ok(self.records.clone())
    }
}

/// Feed source that always fails with a transport error.
#[allow(dead_code)]
pub struct FailingFeed;

#[async_trait]
impl FeedSource for FailingFeed {
    fn provider(&self) -> &str {
        "failing"
    }

    async fn fetch(&self) -> Result<Vec<FeedRecord>, FeedError> {
        Err(FeedError::Transport {
            status: 503,
            body_snippet: Some("maintenance".to_string()),
        })
    }
}

/// Cache backend whose every call fails as if the server went away.
#[allow(dead_code)]
pub struct UnavailableStore;

fn connection_refused() -> CacheError {
    redis::RedisError::from((redis::ErrorKind::IoError, "connection refused")).into()
}

#[async_trait]
impl CacheStore for UnavailableStore {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(connection_refused())
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Option<Duration>) -> Result<(), CacheError> {
        Err(connection_refused())
    }

    async fn delete(&self, _keys: &[String]) -> Result<u64, CacheError> {
        Err(connection_refused())
    }

    async fn keys(&self, _pattern: &str) -> Result<Vec<String>, CacheError> {
        Err(connection_refused())
    }
}
