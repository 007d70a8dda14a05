use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use engine_logging::EventLog;
use gallery_core::{DescriptorSource, DownloadedArtifact, ImageDescriptor};

use crate::config::{pause, Clock, Pacing, ATTEMPT_MULTIPLIER};
use crate::{AtomicFileWriter, FetchError, Fetcher, PersistError, TransformError, Transformer};

#[derive(Debug, thiserror::Error)]
enum AttemptError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// What a pipeline run produced and how much of its budget it used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReport {
    pub artifacts: Vec<DownloadedArtifact>,
    pub attempts: usize,
}

/// Generates, fetches, transforms and stores images one at a time until the
/// target is met or the attempt budget runs out.
pub struct DownloadPipeline {
    fetcher: Arc<dyn Fetcher>,
    transformer: Arc<dyn Transformer>,
    log: Arc<dyn EventLog>,
    scratch_dir: PathBuf,
    pacing: Pacing,
    clock: Clock,
}

impl DownloadPipeline {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        transformer: Arc<dyn Transformer>,
        log: Arc<dyn EventLog>,
        scratch_dir: PathBuf,
        pacing: Pacing,
        clock: Clock,
    ) -> Self {
        Self {
            fetcher,
            transformer,
            log,
            scratch_dir,
            pacing,
            clock,
        }
    }

    pub async fn run(
        &self,
        source: &mut dyn DescriptorSource,
        target_count: usize,
    ) -> DownloadReport {
        self.log.info(&format!(
            "Starting download of {target_count} random images..."
        ));
        let budget = target_count.saturating_mul(ATTEMPT_MULTIPLIER);
        let mut seen: HashSet<String> = HashSet::new();
        let mut artifacts: Vec<DownloadedArtifact> = Vec::with_capacity(target_count);
        let mut attempts = 0;

        while artifacts.len() < target_count && attempts < budget {
            attempts += 1;
            let descriptor = source.next_descriptor();

            // Duplicates still cost an attempt.
            if seen.contains(&descriptor.url) {
                self.log
                    .info(&format!("Skipping already downloaded {}", descriptor.url));
                continue;
            }

            self.log.info(&format!(
                "Downloading from {}: {} ({}x{})",
                descriptor.source_name,
                descriptor.category,
                descriptor.dimensions.width,
                descriptor.dimensions.height
            ));

            match self.attempt(&descriptor, artifacts.len() + 1).await {
                Ok(artifact) => {
                    self.log.info(&format!(
                        "Downloaded: {} ({}kb)",
                        artifact.file_name(),
                        artifact.byte_size / 1024
                    ));
                    seen.insert(descriptor.url);
                    artifacts.push(artifact);
                    pause(self.pacing.after_download).await;
                }
                Err(AttemptError::Fetch(err)) if err.is_soft_skip() => {
                    self.log.warn(&format!(
                        "Skipped small image from {}: {}",
                        descriptor.url, err.kind
                    ));
                    pause(self.pacing.after_skip).await;
                }
                Err(err) => {
                    self.log.error(
                        &format!("Failed to download image (attempt {attempts})"),
                        Some(&err),
                    );
                    pause(self.pacing.after_fetch_error).await;
                }
            }
        }

        if artifacts.len() < target_count {
            self.log.warn(&format!(
                "Attempt budget of {budget} exhausted with {} of {target_count} images",
                artifacts.len()
            ));
        }
        self.log.info(&format!(
            "Successfully downloaded {} images",
            artifacts.len()
        ));
        DownloadReport {
            artifacts,
            attempts,
        }
    }

    async fn attempt(
        &self,
        descriptor: &ImageDescriptor,
        sequence: usize,
    ) -> Result<DownloadedArtifact, AttemptError> {
        let fetched = self.fetcher.fetch(&descriptor.url).await?;
        let encoded = self.transformer.transform(&fetched.bytes)?;

        let created_at = (self.clock)();
        let filename = format!(
            "{}_{}_{}_{}.jpg",
            descriptor.source_name,
            descriptor.category,
            created_at.timestamp_millis(),
            sequence
        );
        let writer = AtomicFileWriter::new(self.scratch_dir.clone());
        let local_path = writer.write(&filename, &encoded)?;

        Ok(DownloadedArtifact {
            local_path,
            source_name: descriptor.source_name.clone(),
            category: descriptor.category.clone(),
            source_url: descriptor.url.clone(),
            byte_size: encoded.len() as u64,
            created_at,
        })
    }
}
