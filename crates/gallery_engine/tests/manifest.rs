mod common;

use std::sync::Arc;

use common::{fixed_clock, insufficient, FakeStore};
use engine_logging::MemoryLog;
use gallery_core::UploadResult;
use gallery_engine::{Manifest, ManifestBuilder, MANIFEST_CONTENT_TYPE};
use pretty_assertions::assert_eq;

fn results(count: usize) -> Vec<UploadResult> {
    (1..=count)
        .map(|n| UploadResult {
            file_name: format!("img_{n}.jpg"),
            content_id: format!("img-cid-{n}"),
            public_url: format!("https://gw.test/img-cid-{n}"),
        })
        .collect()
}

fn builder(store: Arc<FakeStore>) -> ManifestBuilder {
    ManifestBuilder::new(
        store,
        Arc::new(MemoryLog::new()),
        "https://gw.test",
        fixed_clock(),
    )
}

#[tokio::test]
async fn manifest_has_one_entry_per_upload_plus_gallery() {
    for count in [1, 3, 7] {
        let store = Arc::new(FakeStore::new());
        let published = builder(store).publish(&results(count)).await.unwrap();
        assert_eq!(published.manifest.paths.len(), count + 1);
    }
}

#[tokio::test]
async fn gallery_is_uploaded_first_and_indexed() {
    let store = Arc::new(FakeStore::new());
    let uploads = results(2);

    let published = builder(store.clone()).publish(&uploads).await.unwrap();

    let submissions = store.submissions();
    assert_eq!(submissions.len(), 2);
    let gallery = &submissions[0];
    assert_eq!(gallery.tag("Content-Type"), Some("text/html"));
    assert_eq!(gallery.tag("File-Name"), Some("gallery.html"));
    let html = String::from_utf8(gallery.data.clone()).unwrap();
    assert!(html.contains("https://gw.test/img-cid-1"));
    assert!(html.contains("https://gw.test/img-cid-2"));

    assert_eq!(published.manifest.index.path, "gallery.html");
    assert_eq!(published.manifest.content_id("gallery.html"), Some("cid-1"));
    assert_eq!(published.manifest.content_id("img_2.jpg"), Some("img-cid-2"));

    assert_eq!(published.manifest_id, "cid-2");
    assert_eq!(published.manifest_url, "https://gw.test/cid-2");
    assert_eq!(published.gallery_url, "https://gw.test/cid-2/gallery.html");
}

#[tokio::test]
async fn uploaded_manifest_body_matches_returned_manifest() {
    let store = Arc::new(FakeStore::new());
    let published = builder(store.clone()).publish(&results(3)).await.unwrap();

    let manifest_sub = &store.submissions()[1];
    assert_eq!(manifest_sub.tag("Content-Type"), Some(MANIFEST_CONTENT_TYPE));
    assert_eq!(
        manifest_sub.tag("Upload-Date"),
        Some("2025-06-01T09:00:00+00:00")
    );
    let uploaded: Manifest = serde_json::from_slice(&manifest_sub.data).unwrap();
    assert_eq!(uploaded, published.manifest);

    let raw: serde_json::Value = serde_json::from_slice(&manifest_sub.data).unwrap();
    assert_eq!(raw["manifest"], "arweave/paths");
    assert_eq!(raw["version"], "0.1.0");
    assert_eq!(raw["paths"]["img_1.jpg"]["id"], "img-cid-1");
}

#[tokio::test]
async fn funding_failure_on_gallery_is_reported_as_such() {
    let store = Arc::new(FakeStore::new().failing_on(1, insufficient()));
    let err = builder(store.clone()).publish(&results(2)).await.unwrap_err();
    assert!(err.is_insufficient_balance());
    assert!(store.submissions().is_empty());
}
