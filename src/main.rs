//! # Highlights Main Entry Point
//!
//! This is the main entry point for the highlights service.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use highlights::{
    config::{AppConfig, ConfigLoader},
    db,
    feed::HttpFeedClient,
    ingestion::IngestionPipeline,
    seeds,
    server::run_server,
    telemetry,
};

#[derive(Parser, Debug)]
#[command(name = "highlights", version, about = "Football highlights aggregation service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Default)]
enum Command {
    /// Apply migrations, seed the catalogue and serve the HTTP API (default)
    #[default]
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
    /// Run a single ingestion pass and print the report as JSON
    Ingest,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration from layered env files and variables
    let config_loader = ConfigLoader::new();
    let config = config_loader.load()?;

    telemetry::init_tracing(&config)?;
    tracing::info!(profile = %config.profile, "Loaded configuration");
    if let Ok(redacted_json) = config.redacted_json() {
        tracing::debug!(config = %redacted_json, "Effective configuration");
    }

    match cli.command.unwrap_or_default() {
        Command::Serve => serve(config).await,
        Command::Migrate => {
            let db = db::init_pool(&config).await?;
            db::run_migrations(&db).await?;
            db.close().await?;
            Ok(())
        }
        Command::Ingest => ingest_once(config).await,
    }
}

async fn serve(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let db = db::init_pool(&config).await?;
    db::run_migrations(&db).await?;

    if config.seed_competitions {
        let inserted = seeds::seed_competitions(&db).await?;
        tracing::info!(inserted, "Seeded competition catalogue");
    }

    run_server(config, db).await
}

async fn ingest_once(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let db = db::init_pool(&config).await?;
    db::run_migrations(&db).await?;

    let feed = HttpFeedClient::new(&config.feed)?;
    let pipeline = IngestionPipeline::new(db.clone(), Arc::new(feed));
    let report = pipeline.run().await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    db.close().await?;
    Ok(())
}
