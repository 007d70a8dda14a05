use chrono::{TimeZone, Utc};
use gallery_core::{RunReport, UploadResult};
use serde_json::json;

#[test]
fn report_serializes_with_camel_case_keys() {
    let report = RunReport {
        date: Utc.with_ymd_and_hms(2025, 3, 4, 9, 0, 0).unwrap(),
        uploaded_count: 1,
        manifest_id: "man".to_string(),
        gallery_url: "https://gw/man/gallery.html".to_string(),
        upload_results: vec![UploadResult {
            file_name: "a.jpg".to_string(),
            content_id: "cid".to_string(),
            public_url: "https://gw/cid".to_string(),
        }],
    };

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["imagesUploaded"], json!(1));
    assert_eq!(value["manifestId"], json!("man"));
    assert_eq!(value["galleryUrl"], json!("https://gw/man/gallery.html"));
    assert_eq!(
        value["uploadResults"][0],
        json!({"fileName": "a.jpg", "id": "cid", "url": "https://gw/cid"})
    );
    assert_eq!(report.date_key(), "2025-03-04");

    let back: RunReport = serde_json::from_value(value).unwrap();
    assert_eq!(back, report);
}
