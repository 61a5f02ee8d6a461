use std::sync::Arc;

use highlights::checksum::checksum_hex;
use highlights::feed::FeedSource;
use highlights::ingestion::{IngestError, IngestReport, IngestionPipeline, RecordOutcome, SkipReason};
use highlights::models::{Match, Team, Video};
use highlights::repositories::{MatchRepository, VideoRepository};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use serde_json::json;
mod test_utils;
use tempfile::TempDir;
use test_utils::{
    FailingFeed, StaticFeed, mixed_payload, record_json, seed_competition, setup_file_db,
    setup_test_db,
};

async fn seeded_db() -> DatabaseConnection {
    let db = setup_test_db().await.unwrap();
    seed_competition(&db, "Premier League", Some("England"))
        .await
        .unwrap();
    db
}

fn pipeline(db: &DatabaseConnection, feed: impl FeedSource + 'static) -> IngestionPipeline {
    IngestionPipeline::new(db.clone(), Arc::new(feed))
}

#[tokio::test]
async fn counts_created_and_skipped_records() {
    let db = seeded_db().await;

    let report = pipeline(&db, StaticFeed::from_json(&mixed_payload()))
        .run()
        .await
        .unwrap();

    assert_eq!(
        report,
        IngestReport {
            created: 1,
            updated: 0,
            skipped: 2,
        }
    );
    assert_eq!(Match::find().count(&db).await.unwrap(), 1);
    assert_eq!(Video::find().count(&db).await.unwrap(), 1);
    // The record without an away team never reaches team mapping
    assert_eq!(Team::find().count(&db).await.unwrap(), 4);
}

#[tokio::test]
async fn second_run_updates_without_duplicating() {
    let db = seeded_db().await;
    let pipeline = pipeline(&db, StaticFeed::from_json(&mixed_payload()));

    pipeline.run().await.unwrap();
    let report = pipeline.run().await.unwrap();

    assert_eq!(
        report,
        IngestReport {
            created: 0,
            updated: 1,
            skipped: 2,
        }
    );
    assert_eq!(Match::find().count(&db).await.unwrap(), 1);
    assert_eq!(Video::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn video_identity_is_the_hash_of_the_raw_clip() {
    let db = seeded_db().await;
    let payload = json!([record_json(
        "3001",
        "Arsenal",
        "Chelsea",
        "ENGLAND: Premier League",
        "2026-10-12T16:30:00+0000",
    )]);

    pipeline(&db, StaticFeed::from_json(&payload))
        .run()
        .await
        .unwrap();

    let raw_clip = &payload[0]["videos"][0];
    let expected_id = checksum_hex(raw_clip).unwrap();
    let stored = VideoRepository::new(&db)
        .find_by_id(&expected_id)
        .await
        .unwrap()
        .expect("video stored under its content hash");

    assert_eq!(expected_id.len(), 64);
    assert_eq!(stored.title, "Highlights");
    assert_eq!(stored.provider, "static");
    assert_eq!(
        stored.source_url.as_deref(),
        Some("https://feed.example/embed/matchview/3001")
    );
}

#[tokio::test]
async fn changed_clip_content_creates_a_new_video() {
    let db = seeded_db().await;
    let original = json!([record_json(
        "3002",
        "Arsenal",
        "Chelsea",
        "ENGLAND: Premier League",
        "2026-10-12T16:30:00+0000",
    )]);
    let mut edited = original.clone();
    edited[0]["videos"][0]["embed"] = json!("<iframe src='https://feed.example/embed/v2'></iframe>");

    pipeline(&db, StaticFeed::from_json(&original)).run().await.unwrap();
    pipeline(&db, StaticFeed::from_json(&edited)).run().await.unwrap();

    assert_eq!(Match::find().count(&db).await.unwrap(), 1);
    assert_eq!(Video::find().count(&db).await.unwrap(), 2);
}

#[tokio::test]
async fn unknown_competition_is_skipped_not_created() {
    let db = setup_test_db().await.unwrap();
    let payload = json!([record_json(
        "4001",
        "Arsenal",
        "Chelsea",
        "ENGLAND: Premier League",
        "2026-10-12T16:30:00+0000",
    )]);
    let pipeline = pipeline(&db, StaticFeed::from_json(&payload));

    let report = pipeline.run().await.unwrap();
    assert_eq!(report.skipped, 1);
    assert_eq!(Match::find().count(&db).await.unwrap(), 0);

    let record = &StaticFeed::from_json(&payload).fetch().await.unwrap()[0];
    assert_eq!(
        pipeline.process_record(record).await.unwrap(),
        RecordOutcome::Skipped(SkipReason::UnknownCompetition(
            "ENGLAND: Premier League".to_string()
        ))
    );
}

#[tokio::test]
async fn missing_team_names_are_reported() {
    let db = seeded_db().await;
    let mut payload = json!([record_json(
        "5001",
        "Arsenal",
        "Chelsea",
        "ENGLAND: Premier League",
        "2026-10-12T16:30:00+0000",
    )]);
    payload[0]
        .as_object_mut()
        .unwrap()
        .remove("side2");

    let feed = StaticFeed::from_json(&payload);
    let record = &feed.fetch().await.unwrap()[0];
    let outcome = pipeline(&db, StaticFeed::from_json(&payload))
        .process_record(record)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        RecordOutcome::Skipped(SkipReason::MissingField("away team"))
    );
    assert_eq!(Team::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn record_date_becomes_match_date() {
    let db = seeded_db().await;
    let payload = json!([record_json(
        "6001",
        "Arsenal",
        "Chelsea",
        "ENGLAND: Premier League",
        "2026-10-12T16:30:00+0000",
    )]);

    pipeline(&db, StaticFeed::from_json(&payload))
        .run()
        .await
        .unwrap();

    let stored = MatchRepository::new(&db)
        .find_by_ext_id("6001")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        stored.match_date.map(|date| date.to_rfc3339()),
        Some("2026-10-12T16:30:00+00:00".to_string())
    );
    assert_eq!(stored.title, "Arsenal - Chelsea");
}

#[tokio::test]
async fn feed_failure_aborts_before_writing() {
    let db = seeded_db().await;

    let err = pipeline(&db, FailingFeed).run().await.unwrap_err();

    match err {
        IngestError::Feed { provider, .. } => assert_eq!(provider, "failing"),
        other => panic!("expected feed error, got {other:?}"),
    }
    assert_eq!(Team::find().count(&db).await.unwrap(), 0);
    assert_eq!(Match::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn overlapping_runs_converge_on_one_row_per_entity() {
    let dir = TempDir::new().unwrap();
    let db = setup_file_db(dir.path(), 4).await.unwrap();
    seed_competition(&db, "Premier League", Some("England"))
        .await
        .unwrap();

    let records = (0..20)
        .map(|i| {
            record_json(
                &format!("80{i:02}"),
                &format!("Home Side {i}"),
                "Shared Rival",
                "ENGLAND: Premier League",
                &format!("2026-10-12T{:02}:00:00+0000", i),
            )
        })
        .collect::<Vec<_>>();
    let payload = json!(records);

    let first = pipeline(&db, StaticFeed::from_json(&payload));
    let second = pipeline(&db, StaticFeed::from_json(&payload));
    let (first, second) = tokio::join!(first.run(), second.run());
    let (first, second) = (first.unwrap(), second.unwrap());

    // Which run sees a match first is a race; each run still accounts for
    // every record exactly once.
    for report in [first, second] {
        assert_eq!(report.created + report.updated, 20);
        assert_eq!(report.skipped, 0);
    }
    assert!(first.created + second.created >= 20);

    assert_eq!(Match::find().count(&db).await.unwrap(), 20);
    assert_eq!(Video::find().count(&db).await.unwrap(), 20);
    assert_eq!(Team::find().count(&db).await.unwrap(), 21);
}
