//! # Server Configuration
//!
//! This module contains the server setup and configuration for the highlights API.

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use sea_orm::DatabaseConnection;
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::admin_middleware;
use crate::cache::Cache;
use crate::config::AppConfig;
use crate::feed::{FeedSource, HttpFeedClient};
use crate::handlers;
use crate::ingestion::IngestionPipeline;
use crate::listing::VideoListing;
use crate::scheduler::IngestScheduler;
use crate::telemetry::trace_id_middleware;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DatabaseConnection,
    pub cache: Cache,
    pub pipeline: IngestionPipeline,
    pub listing: VideoListing,
}

impl AppState {
    /// Assemble state from already constructed parts.
    pub fn new(
        config: AppConfig,
        db: DatabaseConnection,
        cache: Cache,
        feed: Arc<dyn FeedSource>,
    ) -> Self {
        let listing = VideoListing::new(db.clone(), cache.clone(), config.cache.listing_ttl());
        let pipeline = IngestionPipeline::new(db.clone(), feed);
        Self {
            config: Arc::new(config),
            db,
            cache,
            pipeline,
            listing,
        }
    }
}

/// Build production state: HTTP feed client and the configured cache backend.
pub async fn build_state(
    config: AppConfig,
    db: DatabaseConnection,
) -> Result<AppState, Box<dyn std::error::Error>> {
    let feed = HttpFeedClient::new(&config.feed)?;
    let cache = Cache::from_config(&config.cache).await;
    tracing::info!(
        provider = feed.provider(),
        cache = cache.backend_name(),
        "Application state initialized"
    );
    Ok(AppState::new(config, db, cache, Arc::new(feed)))
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    let admin = Router::new()
        .route("/ingest", post(handlers::ingest::trigger_ingest))
        .route("/competitions", post(handlers::catalog::create_competition))
        .route("/cache", delete(handlers::cache::flush_cache))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_middleware,
        ));

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/videos", get(handlers::videos::list_videos))
        .route("/competitions", get(handlers::catalog::list_competitions))
        .route(
            "/competitions/{slug}/videos",
            get(handlers::videos::list_competition_videos),
        )
        .route("/teams", get(handlers::catalog::list_teams))
        .route("/teams/{slug}/videos", get(handlers::videos::list_team_videos))
        .route("/web-vitals", post(handlers::web_vitals::record_web_vital))
        .merge(admin)
        .fallback(handlers::fallback)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id_middleware))
        .layer(CorsLayer::permissive())
}

/// Starts the server with the given configuration
///
/// The ingestion scheduler runs alongside the listener when an interval is
/// configured; both stop on Ctrl+C or SIGTERM.
pub async fn run_server(
    config: AppConfig,
    db: DatabaseConnection,
) -> Result<(), Box<dyn std::error::Error>> {
    // Resolve the configured bind address
    let addr = config
        .bind_addr()
        .map_err(|e| format!("Invalid server address: {}", e))?;
    let profile = config.profile.clone();
    let ingest_config = config.ingest.clone();

    let state = build_state(config, db.clone()).await?;

    let shutdown = CancellationToken::new();
    let scheduler = IngestScheduler::new(ingest_config, state.pipeline.clone());
    let scheduler_handle = tokio::spawn(scheduler.run(shutdown.clone()));

    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, %profile, "Server listening");

    let signal_token = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            signal_token.cancel();
        })
        .await?;

    shutdown.cancel();
    if let Err(err) = scheduler_handle.await {
        tracing::error!(error = %err, "Ingestion scheduler task panicked");
    }

    if let Err(err) = db.close().await {
        tracing::warn!(error = %err, "Failed to close database pool cleanly");
    }
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::health,
        crate::handlers::videos::list_videos,
        crate::handlers::videos::list_competition_videos,
        crate::handlers::videos::list_team_videos,
        crate::handlers::catalog::list_competitions,
        crate::handlers::catalog::create_competition,
        crate::handlers::catalog::list_teams,
        crate::handlers::ingest::trigger_ingest,
        crate::handlers::web_vitals::record_web_vital,
        crate::handlers::cache::flush_cache,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::error::ApiError,
            crate::handlers::types::HealthResponse,
            crate::handlers::catalog::CompetitionInfo,
            crate::handlers::catalog::TeamInfo,
            crate::handlers::catalog::CreateCompetitionRequest,
            crate::handlers::web_vitals::WebVitalRequest,
            crate::handlers::web_vitals::WebVitalCreated,
            crate::handlers::cache::FlushResponse,
            crate::ingestion::IngestReport,
            crate::listing::VideoSummary,
            crate::listing::EntityRef,
            crate::listing::MatchRef,
        )
    ),
    tags(
        (name = "root", description = "Service information and health"),
        (name = "videos", description = "Paginated highlight listings"),
        (name = "catalog", description = "Competitions and teams"),
        (name = "ingestion", description = "Feed ingestion"),
        (name = "telemetry", description = "Browser performance metrics"),
        (name = "admin", description = "Administrative operations"),
    ),
    info(
        title = "Highlights API",
        description = "Football match highlights aggregated from an upstream video feed",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
