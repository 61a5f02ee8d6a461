//! # Ingestion Scheduler
//!
//! Optional background task that triggers an ingestion run on a fixed,
//! jittered interval. Runs are idempotent, so an overlapping manual trigger
//! is harmless.

use metrics::histogram;
use rand::Rng;
use tokio::time::{Duration, Instant, sleep};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};

use crate::config::IngestConfig;
use crate::ingestion::IngestionPipeline;

/// Background scheduler service.
pub struct IngestScheduler {
    config: IngestConfig,
    pipeline: IngestionPipeline,
}

impl IngestScheduler {
    pub fn new(config: IngestConfig, pipeline: IngestionPipeline) -> Self {
        Self { config, pipeline }
    }

    /// Run the scheduler loop until the provided shutdown token fires.
    #[instrument(skip_all, fields(interval_seconds = self.config.interval_seconds))]
    pub async fn run(self, shutdown: CancellationToken) {
        if !self.config.scheduler_enabled() {
            info!("Ingestion scheduler disabled");
            return;
        }

        info!("Starting ingestion scheduler");

        loop {
            let delay = next_delay(&self.config, &mut rand::thread_rng());
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Ingestion scheduler shutdown requested");
                    break;
                }
                _ = sleep(delay) => {
                    let started = Instant::now();
                    match self.pipeline.run().await {
                        Ok(report) => info!(
                            created = report.created,
                            updated = report.updated,
                            skipped = report.skipped,
                            "Scheduled ingestion finished"
                        ),
                        Err(err) => error!(error = %err, "Scheduled ingestion failed"),
                    }
                    histogram!("ingest_run_duration_ms")
                        .record(started.elapsed().as_secs_f64() * 1_000.0);
                }
            }
        }

        info!("Ingestion scheduler stopped");
    }
}

/// Interval plus a random extra delay of up to `jitter_pct` of it.
fn next_delay<R: Rng + ?Sized>(config: &IngestConfig, rng: &mut R) -> Duration {
    let base = config.interval_seconds as f64;
    let jitter_pct = config.jitter_pct.clamp(0.0, 1.0);

    let jitter = if jitter_pct == 0.0 {
        0.0
    } else {
        base * rng.gen_range(0.0..=jitter_pct)
    };

    Duration::from_secs_f64(base + jitter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use rand::SeedableRng;
    use sea_orm::DatabaseConnection;

    use crate::feed::{FeedError, FeedRecord, FeedSource};

    struct UnusedFeed;

    #[async_trait]
    impl FeedSource for UnusedFeed {
        fn provider(&self) -> &str {
            "test"
        }

        async fn fetch(&self) -> Result<Vec<FeedRecord>, FeedError> {
            Ok(Vec::new())
        }
    }

    fn pipeline() -> IngestionPipeline {
        IngestionPipeline::new(DatabaseConnection::default(), Arc::new(UnusedFeed))
    }

    #[test]
    fn delay_respects_jitter_bounds() {
        let config = IngestConfig {
            interval_seconds: 900,
            jitter_pct: 0.2,
        };
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let delay = next_delay(&config, &mut rng).as_secs_f64();
            assert!((900.0..=1080.0).contains(&delay));
        }
    }

    #[test]
    fn zero_jitter_gives_exact_interval() {
        let config = IngestConfig {
            interval_seconds: 600,
            jitter_pct: 0.0,
        };
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        assert_eq!(next_delay(&config, &mut rng), Duration::from_secs(600));
    }

    #[tokio::test]
    async fn disabled_scheduler_returns_immediately() {
        let scheduler = IngestScheduler::new(IngestConfig::default(), pipeline());
        tokio::time::timeout(Duration::from_secs(1), scheduler.run(CancellationToken::new()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn stops_when_cancelled() {
        let config = IngestConfig {
            interval_seconds: 3600,
            jitter_pct: 0.1,
        };
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(IngestScheduler::new(config, pipeline()).run(shutdown.clone()));

        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
