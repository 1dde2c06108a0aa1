mod support;

use chrono::NaiveDate;
use dashboard_backend::models::TableSource;
use dashboard_backend::services::acquisition::{
    acquire_or_fallback, acquire_working_table, AcquisitionError, AcquisitionOptions,
};
use dashboard_backend::services::fallback::{load_fallback_table, write_dataset};
use dashboard_backend::services::youtube_client::SearchOrder;
use dashboard_backend::config::CHANNELS;
use std::sync::atomic::Ordering;
use support::{sample_table, FakeSource};

fn options(concurrency: usize) -> AcquisitionOptions {
    AcquisitionOptions {
        max_results: 1000,
        order: SearchOrder::Relevance,
        concurrency,
    }
}

fn reference() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 3, 11).unwrap()
}

fn source() -> FakeSource {
    FakeSource::new()
        .video("Meet Kevin", "k1", "Meet Kevin", "2021-03-01T10:00:00Z", 1000, &["stocks"])
        .video("Meet Kevin", "x1", "Meet Kevin Reacts", "2021-03-09T10:00:00Z", 50, &[])
        .video("Meet Kevin", "k2", "Meet Kevin", "2021-03-05T10:00:00Z", 3000, &["money"])
        .video("Andrei Jikh", "a1", "Andrei Jikh", "2021-03-02T10:00:00Z", 900, &[])
        .video("Joma Tech", "j1", "Joma Tech", "2021-03-10T10:00:00Z", 0, &[])
        .video("Ali Abdaal", "al1", "Ali Abdaal", "2021-03-03T10:00:00Z", 800, &["study"])
        .video("Graham Stephan", "g1", "Graham Stephan", "2021-03-04T10:00:00Z", 700, &[])
}

#[tokio::test]
async fn live_table_keeps_only_channel_videos_newest_first() {
    let table = acquire_working_table(&source(), &CHANNELS, &options(4), reference())
        .await
        .unwrap();

    assert_eq!(table.source, TableSource::Live);
    let ids: Vec<&str> = table.rows.iter().map(|r| r.channel_video_id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "Meet Kevin 0",
            "Meet Kevin 1",
            "Andrei Jikh 0",
            "Joma Tech 0",
            "Ali Abdaal 0",
            "Graham Stephan 0",
        ]
    );

    let newest = &table.rows[0];
    assert_eq!(newest.video_id, "k2");
    assert_eq!(newest.fetch_index, 2);
    assert_eq!(newest.days_published, 6);
    assert_eq!(newest.average_view_count, 500.0);
    assert_eq!(newest.positive_rating, Some(10.0));

    let joma = &table.rows[3];
    assert_eq!(joma.days_published, 1);
    assert!(joma.engagement_rating.is_none());
}

#[tokio::test]
async fn every_hit_is_looked_up_once() {
    let source = source();
    acquire_working_table(&source, &CHANNELS, &options(2), reference())
        .await
        .unwrap();
    assert_eq!(source.lookups.load(Ordering::SeqCst), 7);
}

#[tokio::test]
async fn concurrency_does_not_change_the_table() {
    let serial = acquire_working_table(&source(), &CHANNELS, &options(1), reference())
        .await
        .unwrap();
    let parallel = acquire_working_table(&source(), &CHANNELS, &options(16), reference())
        .await
        .unwrap();
    assert_eq!(serial, parallel);
}

#[tokio::test]
async fn remote_failure_aborts_the_live_run() {
    let source = source().failing_on("Joma Tech");
    let err = acquire_working_table(&source, &CHANNELS, &options(4), reference())
        .await
        .unwrap_err();
    assert!(matches!(err, AcquisitionError::Remote(_)));
}

#[tokio::test]
async fn failure_on_third_channel_yields_exactly_the_fallback_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dataset.csv");
    write_dataset(&sample_table(), &path).unwrap();
    let expected = load_fallback_table(&path).unwrap();

    let source = source().failing_on("Joma Tech");
    let table = acquire_or_fallback(Some(&source), &CHANNELS, &options(4), reference(), &path)
        .await
        .unwrap();

    assert_eq!(table.source, TableSource::Fallback);
    assert_eq!(table, expected);
    assert!(table.rows.iter().all(|r| r.video_id != "k1"));
}

#[tokio::test]
async fn missing_source_uses_the_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dataset.csv");
    write_dataset(&sample_table(), &path).unwrap();

    let table = acquire_or_fallback::<FakeSource>(None, &CHANNELS, &options(4), reference(), &path)
        .await
        .unwrap();
    assert_eq!(table.len(), sample_table().len());
}

#[tokio::test]
async fn missing_fallback_after_failure_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.csv");

    let source = source().failing_on("Meet Kevin");
    let result =
        acquire_or_fallback(Some(&source), &CHANNELS, &options(4), reference(), &path).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn successful_run_never_reads_the_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.csv");

    let table = acquire_or_fallback(Some(&source()), &CHANNELS, &options(4), reference(), &path)
        .await
        .unwrap();
    assert_eq!(table.source, TableSource::Live);
}

#[test]
fn bundled_dataset_loads() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../dataset.csv");
    let table = load_fallback_table(&path).unwrap();
    assert_eq!(table.len(), 40);
    for channel in CHANNELS {
        assert_eq!(table.channel_rows(channel).count(), 8, "{channel}");
    }
}
