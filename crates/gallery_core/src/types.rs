use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Dimensions;

/// One request against the image service. The URL is its only identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDescriptor {
    pub source_name: String,
    pub category: String,
    pub dimensions: Dimensions,
    pub url: String,
}

/// A transformed image sitting in the scratch directory, waiting for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedArtifact {
    pub local_path: PathBuf,
    pub source_name: String,
    pub category: String,
    pub source_url: String,
    pub byte_size: u64,
    pub created_at: DateTime<Utc>,
}

impl DownloadedArtifact {
    pub fn file_name(&self) -> String {
        self.local_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub file_name: String,
    #[serde(rename = "id")]
    pub content_id: String,
    #[serde(rename = "url")]
    pub public_url: String,
}

/// Summary persisted once per successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub date: DateTime<Utc>,
    #[serde(rename = "imagesUploaded")]
    pub uploaded_count: usize,
    pub manifest_id: String,
    pub gallery_url: String,
    pub upload_results: Vec<UploadResult>,
}

impl RunReport {
    /// Calendar day the report is keyed by, `YYYY-MM-DD`.
    pub fn date_key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}
