mod common;

use std::sync::Arc;

use common::{artifacts_in, fixed_clock, insufficient, FakeStore};
use engine_logging::{LogLevel, MemoryLog};
use gallery_engine::{Pacing, StorageUploader, StoreError, FUNDING_HINT, UPLOAD_TYPE_TAG};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn uploader(store: Arc<FakeStore>, log: Arc<MemoryLog>) -> StorageUploader {
    StorageUploader::new(store, log, "https://gw.test/", Pacing::none(), fixed_clock())
}

#[tokio::test]
async fn insufficient_balance_on_one_item_keeps_the_rest_in_order() {
    let dir = TempDir::new().unwrap();
    let artifacts = artifacts_in(dir.path(), 5);
    let store = Arc::new(FakeStore::new().failing_on(3, insufficient()));
    let log = Arc::new(MemoryLog::new());

    let summary = uploader(store.clone(), log.clone())
        .upload_all(&artifacts)
        .await;

    let names: Vec<_> = summary.results.iter().map(|r| r.file_name.clone()).collect();
    let expected: Vec<_> = [0, 1, 3, 4]
        .iter()
        .map(|&i| artifacts[i].file_name())
        .collect();
    assert_eq!(names, expected);
    assert_eq!(summary.failures, 1);
    assert_eq!(summary.insufficient_balance, 1);
    assert!(log.contains(LogLevel::Error, "Insufficient balance for"));
    assert!(log.contains(LogLevel::Warn, FUNDING_HINT));
}

#[tokio::test]
async fn results_carry_content_id_and_gateway_url() {
    let dir = TempDir::new().unwrap();
    let artifacts = artifacts_in(dir.path(), 2);
    let store = Arc::new(FakeStore::new());

    let summary = uploader(store, Arc::new(MemoryLog::new()))
        .upload_all(&artifacts)
        .await;

    assert_eq!(summary.results[0].content_id, "cid-1");
    assert_eq!(summary.results[0].public_url, "https://gw.test/cid-1");
    assert_eq!(summary.results[1].public_url, "https://gw.test/cid-2");
}

#[tokio::test]
async fn submissions_carry_bytes_and_metadata_tags() {
    let dir = TempDir::new().unwrap();
    let artifacts = artifacts_in(dir.path(), 1);
    let store = Arc::new(FakeStore::new());

    uploader(store.clone(), Arc::new(MemoryLog::new()))
        .upload_all(&artifacts)
        .await;

    let submissions = store.submissions();
    assert_eq!(submissions.len(), 1);
    let sub = &submissions[0];
    assert_eq!(sub.data, std::fs::read(&artifacts[0].local_path).unwrap());
    assert_eq!(sub.tag("Content-Type"), Some("image/jpeg"));
    assert_eq!(sub.tag("File-Name"), Some(artifacts[0].file_name().as_str()));
    assert_eq!(sub.tag("Upload-Date"), Some("2025-06-01T09:00:00+00:00"));
    assert_eq!(sub.tag("Upload-Type"), Some(UPLOAD_TYPE_TAG));
}

#[tokio::test]
async fn price_failures_are_not_fatal() {
    let dir = TempDir::new().unwrap();
    let artifacts = artifacts_in(dir.path(), 2);
    let store = Arc::new(FakeStore::new().with_price_failure());
    let log = Arc::new(MemoryLog::new());

    let summary = uploader(store, log.clone()).upload_all(&artifacts).await;

    assert_eq!(summary.results.len(), 2);
    assert!(log.contains(LogLevel::Warn, "Could not get price estimate"));
}

#[tokio::test]
async fn unreadable_and_rejected_items_are_skipped() {
    let dir = TempDir::new().unwrap();
    let artifacts = artifacts_in(dir.path(), 3);
    std::fs::remove_file(&artifacts[0].local_path).unwrap();
    let store = Arc::new(FakeStore::new().failing_on(
        1,
        StoreError::Rejected {
            status: 500,
            message: "boom".into(),
        },
    ));
    let log = Arc::new(MemoryLog::new());

    let summary = uploader(store, log.clone()).upload_all(&artifacts).await;

    assert_eq!(summary.results.len(), 1);
    assert_eq!(summary.results[0].file_name, artifacts[2].file_name());
    assert_eq!(summary.failures, 2);
    assert_eq!(summary.insufficient_balance, 0);
    assert!(!log.contains(LogLevel::Warn, FUNDING_HINT));
}

#[tokio::test]
async fn init_warns_about_empty_wallet() {
    let store = Arc::new(FakeStore::new().with_balance(Ok(0)));
    let log = Arc::new(MemoryLog::new());
    uploader(store, log.clone()).init().await;
    assert!(log.contains(LogLevel::Warn, "balance is 0"));
    assert!(log.contains(LogLevel::Warn, FUNDING_HINT));
}

#[tokio::test]
async fn init_survives_balance_errors() {
    let store = Arc::new(FakeStore::new().with_balance(Err(StoreError::MissingCredential)));
    let log = Arc::new(MemoryLog::new());
    uploader(store, log.clone()).init().await;
    assert!(log.contains(LogLevel::Error, "Failed to check wallet balance"));
}
