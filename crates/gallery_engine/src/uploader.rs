use std::sync::Arc;

use engine_logging::EventLog;
use gallery_core::{DownloadedArtifact, UploadResult};

use crate::config::{gateway_url, pause, Clock, Pacing};
use crate::{ContentStore, StoreError, Tag};

pub const FUNDING_HINT: &str =
    "Store balance is insufficient: fund the wallet before the next run";

pub const UPLOAD_TYPE_TAG: &str = "daily-auto";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadSummary {
    /// One entry per accepted artifact, in input order.
    pub results: Vec<UploadResult>,
    pub failures: usize,
    /// How many of the failures were refused for lack of funds.
    pub insufficient_balance: usize,
}

#[derive(Debug, thiserror::Error)]
enum UploadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Uploads artifacts one by one, isolating per-item failures.
pub struct StorageUploader {
    store: Arc<dyn ContentStore>,
    log: Arc<dyn EventLog>,
    gateway_base: String,
    pacing: Pacing,
    clock: Clock,
}

impl StorageUploader {
    pub fn new(
        store: Arc<dyn ContentStore>,
        log: Arc<dyn EventLog>,
        gateway_base: impl Into<String>,
        pacing: Pacing,
        clock: Clock,
    ) -> Self {
        Self {
            store,
            log,
            gateway_base: gateway_base.into(),
            pacing,
            clock,
        }
    }

    /// Checks the balance once per run. Never fails the run.
    pub async fn init(&self) {
        match self.store.balance().await {
            Ok(0) => {
                self.log.info("Wallet balance: 0");
                self.log
                    .warn("Wallet balance is 0, some uploads may fail");
                self.log.warn(FUNDING_HINT);
            }
            Ok(balance) => self.log.info(&format!("Wallet balance: {balance}")),
            Err(err) => self
                .log
                .error("Failed to check wallet balance", Some(&err)),
        }
    }

    pub async fn upload_all(&self, artifacts: &[DownloadedArtifact]) -> UploadSummary {
        let mut summary = UploadSummary::default();

        for (index, artifact) in artifacts.iter().enumerate() {
            let has_next = index + 1 < artifacts.len();
            let file_name = artifact.file_name();

            match self.upload_one(artifact, &file_name).await {
                Ok(result) => {
                    self.log.info(&format!(
                        "Uploaded: {} ({}kb) - ID: {}",
                        result.file_name,
                        artifact.byte_size / 1024,
                        result.content_id
                    ));
                    summary.results.push(result);
                    if has_next {
                        pause(self.pacing.after_upload).await;
                    }
                }
                Err(err) => {
                    summary.failures += 1;
                    if matches!(err, UploadError::Store(ref e) if e.is_insufficient_balance()) {
                        summary.insufficient_balance += 1;
                        self.log.error(
                            &format!("Insufficient balance for {file_name}"),
                            Some(&err),
                        );
                        self.log.warn(FUNDING_HINT);
                    } else {
                        self.log
                            .error(&format!("Failed to upload {file_name}"), Some(&err));
                    }
                    if has_next {
                        pause(self.pacing.after_upload_error).await;
                    }
                }
            }
        }

        summary
    }

    async fn upload_one(
        &self,
        artifact: &DownloadedArtifact,
        file_name: &str,
    ) -> Result<UploadResult, UploadError> {
        let data = tokio::fs::read(&artifact.local_path)
            .await
            .map_err(|source| UploadError::Read {
                path: artifact.local_path.display().to_string(),
                source,
            })?;
        let size_kb = data.len() / 1024;

        match self.store.price(data.len() as u64).await {
            Ok(price) => self.log.info(&format!(
                "Estimated cost for {file_name} ({size_kb}kb): {price}"
            )),
            Err(err) => self.log.warn(&format!(
                "Could not get price estimate for {file_name}: {err}"
            )),
        }

        let tags = vec![
            Tag::new("Content-Type", "image/jpeg"),
            Tag::new("File-Name", file_name),
            Tag::new("Upload-Date", (self.clock)().to_rfc3339()),
            Tag::new("Upload-Type", UPLOAD_TYPE_TAG),
        ];
        let content_id = self.store.submit(data, &tags).await?;

        Ok(UploadResult {
            file_name: file_name.to_string(),
            public_url: gateway_url(&self.gateway_base, &content_id),
            content_id,
        })
    }
}
