//! Ingestion pipeline.
//!
//! Pulls the feed once and folds every record into the database through
//! natural-key upserts, so running the pipeline repeatedly (or concurrently)
//! converges on the same rows.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use metrics::counter;
use sea_orm::{DatabaseConnection, DbErr};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{Instrument, debug, error, info, info_span};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::checksum::checksum_hex;
use crate::feed::{FeedError, FeedRecord, FeedSource, FeedVideo};
use crate::mapping::{CompetitionName, EntityMapper};
use crate::models::matches::MatchStatus;
use crate::repositories::{MatchRepository, MatchUpsert, VideoRepository, VideoUpsert, VideoWrite};

/// Why a record was left out of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// A required name was absent or blank
    MissingField(&'static str),
    /// The competition is not in the catalogue
    UnknownCompetition(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingField(field) => write!(f, "missing {field}"),
            SkipReason::UnknownCompetition(name) => write!(f, "unknown competition '{name}'"),
        }
    }
}

/// Result of folding one record into the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Created,
    Updated,
    Skipped(SkipReason),
}

impl RecordOutcome {
    fn label(&self) -> &'static str {
        match self {
            RecordOutcome::Created => "created",
            RecordOutcome::Updated => "updated",
            RecordOutcome::Skipped(_) => "skipped",
        }
    }
}

/// Per-run record counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IngestReport {
    /// Records whose match did not exist before the run
    pub created: u64,
    /// Records whose match already existed
    pub updated: u64,
    /// Records left out (missing names or unknown competition)
    pub skipped: u64,
}

impl IngestReport {
    fn record(&mut self, outcome: &RecordOutcome) {
        match outcome {
            RecordOutcome::Created => self.created += 1,
            RecordOutcome::Updated => self.updated += 1,
            RecordOutcome::Skipped(_) => self.skipped += 1,
        }
    }
}

/// Failures that abort a run
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("feed '{provider}' failed: {source}")]
    Feed {
        provider: String,
        #[source]
        source: FeedError,
    },

    #[error("persistence failed: {0}")]
    Persistence(#[from] DbErr),

    #[error("failed to hash feed content: {0}")]
    Checksum(#[from] serde_json::Error),
}

/// Normalized fields a stored video is compared on
#[derive(Serialize)]
struct VideoFingerprint<'a> {
    match_ext_id: &'a str,
    title: &'a str,
    embed_html: &'a str,
    source_url: Option<&'a str>,
    thumbnail_url: Option<&'a str>,
}

/// Runs feed ingestion against the database.
#[derive(Clone)]
pub struct IngestionPipeline {
    db: DatabaseConnection,
    feed: Arc<dyn FeedSource>,
}

impl IngestionPipeline {
    pub fn new(db: DatabaseConnection, feed: Arc<dyn FeedSource>) -> Self {
        Self { db, feed }
    }

    pub fn provider(&self) -> &str {
        self.feed.provider()
    }

    /// Fetch the feed and process every record.
    ///
    /// A feed failure aborts before anything is written; a database failure
    /// aborts the remainder of the run. Records already written stay written
    /// and are reprocessed idempotently by the next run.
    pub async fn run(&self) -> Result<IngestReport, IngestError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("ingest_run", %run_id, provider = %self.provider());
        self.run_inner().instrument(span).await
    }

    async fn run_inner(&self) -> Result<IngestReport, IngestError> {
        info!("Starting ingestion run");

        let records = match self.feed.fetch().await {
            Ok(records) => records,
            Err(source) => {
                counter!("ingest_runs_total", "result" => "feed_error").increment(1);
                error!(error = %source, "Feed fetch failed; nothing written");
                return Err(IngestError::Feed {
                    provider: self.provider().to_string(),
                    source,
                });
            }
        };

        let mut report = IngestReport::default();
        for record in &records {
            let outcome = match self.process_record(record).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    counter!("ingest_runs_total", "result" => "db_error").increment(1);
                    error!(error = %err, title = %record.title, "Record failed; aborting run");
                    return Err(err);
                }
            };

            if let RecordOutcome::Skipped(reason) = &outcome {
                info!(title = %record.title, %reason, "Skipping record");
            }
            counter!("ingest_records_total", "outcome" => outcome.label()).increment(1);
            report.record(&outcome);
        }

        counter!("ingest_runs_total", "result" => "ok").increment(1);
        info!(
            records = records.len(),
            created = report.created,
            updated = report.updated,
            skipped = report.skipped,
            "Ingestion run finished"
        );
        Ok(report)
    }

    /// Fold one feed record into the database.
    pub async fn process_record(&self, record: &FeedRecord) -> Result<RecordOutcome, IngestError> {
        let Some(home_name) = record.home_team() else {
            return Ok(RecordOutcome::Skipped(SkipReason::MissingField("home team")));
        };
        let Some(away_name) = record.away_team() else {
            return Ok(RecordOutcome::Skipped(SkipReason::MissingField("away team")));
        };
        let Some(raw_competition) = record.competition_name() else {
            return Ok(RecordOutcome::Skipped(SkipReason::MissingField("competition")));
        };

        let mapper = EntityMapper::new(&self.db);
        let home = mapper.ensure_team(home_name, None).await?;
        let away = mapper.ensure_team(away_name, None).await?;

        let parsed = CompetitionName::parse(raw_competition);
        let Some(competition) = mapper
            .find_competition_by_name(&parsed.name, parsed.country.as_deref())
            .await?
        else {
            return Ok(RecordOutcome::Skipped(SkipReason::UnknownCompetition(
                raw_competition.to_string(),
            )));
        };

        let ext_id = record.external_id();
        let (stored_match, existed) = MatchRepository::new(&self.db)
            .upsert(MatchUpsert {
                ext_id: ext_id.clone(),
                title: record.title.trim().to_string(),
                home_team_id: home.id,
                away_team_id: away.id,
                competition_id: competition.id,
                match_date: record.date,
                status: MatchStatus::Finished,
            })
            .await?;

        let published_at = record.date.unwrap_or_else(|| Utc::now().fixed_offset());
        let videos = VideoRepository::new(&self.db);
        for video in &record.videos {
            let values = self.video_values(record, video, &ext_id, stored_match.id, published_at)?;
            let write = videos.upsert(values).await?;
            if write != VideoWrite::Unchanged {
                debug!(match_id = stored_match.id, ?write, "Stored video");
            }
        }

        Ok(if existed {
            RecordOutcome::Updated
        } else {
            RecordOutcome::Created
        })
    }

    fn video_values(
        &self,
        record: &FeedRecord,
        video: &FeedVideo,
        ext_id: &str,
        match_id: i32,
        published_at: DateTime<FixedOffset>,
    ) -> Result<VideoUpsert, serde_json::Error> {
        let title = match video.title.trim() {
            "" => record.title.trim(),
            title => title,
        };

        let fingerprint = VideoFingerprint {
            match_ext_id: ext_id,
            title,
            embed_html: &video.embed,
            source_url: record.matchview_url.as_deref(),
            thumbnail_url: record.thumbnail.as_deref(),
        };

        Ok(VideoUpsert {
            id: checksum_hex(&video.raw)?,
            match_id,
            title: title.to_string(),
            embed_html: video.embed.clone(),
            source_url: record.matchview_url.clone(),
            thumbnail_url: record.thumbnail.clone(),
            provider: self.provider().to_string(),
            published_at,
            checksum: checksum_hex(&fingerprint)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_tallies_outcomes() {
        let mut report = IngestReport::default();
        for outcome in [
            RecordOutcome::Created,
            RecordOutcome::Updated,
            RecordOutcome::Updated,
            RecordOutcome::Skipped(SkipReason::MissingField("home team")),
        ] {
            report.record(&outcome);
        }
        assert_eq!(
            report,
            IngestReport {
                created: 1,
                updated: 2,
                skipped: 1
            }
        );
    }

    #[test]
    fn skip_reasons_render_for_logs() {
        assert_eq!(
            SkipReason::UnknownCompetition("MARS: Red League".into()).to_string(),
            "unknown competition 'MARS: Red League'"
        );
        assert_eq!(
            SkipReason::MissingField("competition").to_string(),
            "missing competition"
        );
    }
}
