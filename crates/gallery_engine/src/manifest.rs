use std::collections::BTreeMap;
use std::sync::Arc;

use engine_logging::EventLog;
use gallery_core::UploadResult;
use serde::{Deserialize, Serialize};

use crate::config::{gateway_url, Clock};
use crate::gallery::{render_gallery_html, GALLERY_FILENAME};
use crate::{ContentStore, StoreError, Tag};

pub const MANIFEST_KIND: &str = "arweave/paths";
pub const MANIFEST_VERSION: &str = "0.1.0";
pub const MANIFEST_CONTENT_TYPE: &str = "application/x.arweave-manifest+json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestIndex {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub id: String,
}

/// Path manifest: logical file names mapped to content ids, with the gallery
/// page as the index document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub manifest: String,
    pub version: String,
    pub index: ManifestIndex,
    pub paths: BTreeMap<String, ManifestEntry>,
}

impl Manifest {
    pub fn new(index_path: impl Into<String>) -> Self {
        Self {
            manifest: MANIFEST_KIND.to_string(),
            version: MANIFEST_VERSION.to_string(),
            index: ManifestIndex {
                path: index_path.into(),
            },
            paths: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, content_id: impl Into<String>) {
        self.paths.insert(
            name.into(),
            ManifestEntry {
                id: content_id.into(),
            },
        );
    }

    pub fn content_id(&self, name: &str) -> Option<&str> {
        self.paths.get(name).map(|entry| entry.id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedManifest {
    pub manifest_id: String,
    pub manifest_url: String,
    pub gallery_url: String,
    pub manifest: Manifest,
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("failed to upload {object}: {source}")]
    Store {
        object: &'static str,
        #[source]
        source: StoreError,
    },
    #[error("failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl PublishError {
    pub fn is_insufficient_balance(&self) -> bool {
        matches!(self, PublishError::Store { source, .. } if source.is_insufficient_balance())
    }
}

pub struct ManifestBuilder {
    store: Arc<dyn ContentStore>,
    log: Arc<dyn EventLog>,
    gateway_base: String,
    clock: Clock,
}

impl ManifestBuilder {
    pub fn new(
        store: Arc<dyn ContentStore>,
        log: Arc<dyn EventLog>,
        gateway_base: impl Into<String>,
        clock: Clock,
    ) -> Self {
        Self {
            store,
            log,
            gateway_base: gateway_base.into(),
            clock,
        }
    }

    /// Uploads the gallery page, then the manifest pointing at it and at
    /// every uploaded image.
    pub async fn publish(
        &self,
        results: &[UploadResult],
    ) -> Result<PublishedManifest, PublishError> {
        self.log.info("Creating manifest and gallery...");
        let now = (self.clock)();

        let mut manifest = Manifest::new(GALLERY_FILENAME);
        for result in results {
            manifest.insert(result.file_name.clone(), result.content_id.clone());
        }

        let html = render_gallery_html(results, &self.gateway_base, now);
        let gallery_tags = [
            Tag::new("Content-Type", "text/html"),
            Tag::new("File-Name", GALLERY_FILENAME),
        ];
        let gallery_id = self
            .store
            .submit(html.into_bytes(), &gallery_tags)
            .await
            .map_err(|source| PublishError::Store {
                object: "gallery",
                source,
            })?;
        self.log
            .info(&format!("Uploaded gallery page - ID: {gallery_id}"));
        manifest.insert(GALLERY_FILENAME, gallery_id);

        let body = serde_json::to_vec_pretty(&manifest)?;
        let manifest_tags = [
            Tag::new("Content-Type", MANIFEST_CONTENT_TYPE),
            Tag::new("Upload-Date", now.to_rfc3339()),
        ];
        let manifest_id = self
            .store
            .submit(body, &manifest_tags)
            .await
            .map_err(|source| PublishError::Store {
                object: "manifest",
                source,
            })?;

        let manifest_url = gateway_url(&self.gateway_base, &manifest_id);
        let gallery_url = gateway_url(&manifest_url, GALLERY_FILENAME);
        Ok(PublishedManifest {
            manifest_id,
            manifest_url,
            gallery_url,
            manifest,
        })
    }
}
