//! End-to-end pipeline tests over the public API
//!
//! Exercises the full gate -> parse -> identity -> normalize -> sink chain
//! with on-disk fixtures, the way the two ingestion entry points drive it.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::NaiveDate;
use cloudtrack_ingest::loader::{self, FileOutcome};
use cloudtrack_ingest::sink::MemorySink;
use cloudtrack_ingest::validate::EXPECTED_COLUMNS;
use std::fs;
use tempfile::TempDir;

/// One dense 156-column line with a real timestamp and symbol; delta
/// features carry the `##` sentinel like the first timestep of a real track.
fn first_timestep_line() -> String {
    let mut fields: Vec<String> = (0..EXPECTED_COLUMNS).map(|_| "2.25".to_string()).collect();
    fields[0] = "1".to_string(); // id
    fields[1] = "840".to_string(); // area_size
    fields[2] = "23.5".to_string(); // xg_cloud
    fields[3] = "38.1".to_string(); // yg_cloud
    fields[144] = "2021".to_string();
    fields[145] = "6".to_string();
    fields[146] = "15".to_string();
    fields[147] = "13".to_string();
    fields[148] = "42".to_string();
    fields[149] = "CB".to_string();
    for delta in 150..155 {
        fields[delta] = "##".to_string();
    }
    fields.join(" ")
}

fn dense_file(lines: usize) -> String {
    let line = first_timestep_line();
    let mut content = String::new();
    for _ in 0..lines {
        content.push_str(&line);
        content.push('\n');
    }
    content
}

#[tokio::test]
async fn test_bulk_directory_with_one_valid_and_one_short_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("track-20210615.1342-cb.txt"),
        dense_file(6),
    )
    .unwrap();
    fs::write(dir.path().join("track-20210615.1015-cb.txt"), "1 2\n3 4\n5 6\n").unwrap();

    let mut sink = MemorySink::default();
    let report = loader::bulk_load(dir.path(), &mut sink).await.unwrap();

    // identity batch of size 1, observation batch matching the valid file's
    // line count, short file recorded as rejected rather than inserted
    assert_eq!(sink.identities.len(), 1);
    assert_eq!(sink.observations.len(), 6);
    assert_eq!(report.accepted, 1);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].0, "track-20210615.1015-cb.txt");

    let identity = &sink.identities[0];
    assert_eq!(identity.file_name, "track-20210615.1342-cb.txt");
    assert_eq!(identity.cloud_id, 202106151342);

    let expected_timestamp = NaiveDate::from_ymd_opt(2021, 6, 15)
        .unwrap()
        .and_hms_opt(13, 42, 0)
        .unwrap();
    for observation in &sink.observations {
        assert_eq!(observation.cloud_id, identity.cloud_id);
        assert_eq!(observation.timestamp, expected_timestamp);
        assert_eq!(observation.m_s_symbol, "CB");
        // sentinel deltas normalized to zero, everything else untouched
        assert_eq!(observation.d_area, 0.0);
        assert_eq!(observation.d_tempc50_b9, 0.0);
        assert_eq!(observation.skew_b9, 2.25);
        assert_eq!(observation.t_mean_b5, 2.25);
    }
}

#[tokio::test]
async fn test_incremental_accept_then_duplicate_resubmission() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("track-20210615.1342-cb.txt");
    fs::write(&path, dense_file(4)).unwrap();

    let mut sink = MemorySink::default();

    let outcome = loader::incremental_load(&path, &mut sink).await.unwrap();
    assert!(matches!(outcome, FileOutcome::Accepted { .. }));
    assert_eq!(sink.observations.len(), 4);

    // No idempotency anywhere in the pipeline: the second submission
    // appends a complete duplicate set.
    loader::incremental_load(&path, &mut sink).await.unwrap();
    assert_eq!(sink.identities.len(), 2);
    assert_eq!(sink.identities[0], sink.identities[1]);
    assert_eq!(sink.observations.len(), 8);
}

#[tokio::test]
async fn test_incremental_width_mismatch_is_terminal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("track-20210615.1342-cb.txt");
    let narrow = "1 2 3 4\n".repeat(5);
    fs::write(&path, narrow).unwrap();

    let mut sink = MemorySink::default();
    let outcome = loader::incremental_load(&path, &mut sink).await.unwrap();

    assert!(matches!(outcome, FileOutcome::Rejected(_)));
    assert!(sink.identities.is_empty());
    assert!(sink.observations.is_empty());
}
