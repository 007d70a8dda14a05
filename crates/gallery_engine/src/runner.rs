use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

use engine_logging::EventLog;
use gallery_core::{
    update, DescriptorSource, DownloadedArtifact, Effect, RunEvent, RunPhase, RunReport,
    RunState, UploadResult,
};

use crate::{
    write_report, ContentStore, DownloadPipeline, Fetcher, ManifestBuilder, PublishedManifest,
    RunConfig, RunLock, ScratchDir, StorageUploader, Transformer, FUNDING_HINT,
};

/// Collaborators a run talks to.
#[derive(Clone)]
pub struct RunServices {
    pub fetcher: Arc<dyn Fetcher>,
    pub transformer: Arc<dyn Transformer>,
    pub store: Arc<dyn ContentStore>,
    pub log: Arc<dyn EventLog>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub state: RunState,
    pub report: Option<RunReport>,
    pub report_path: Option<PathBuf>,
}

impl RunOutcome {
    pub fn succeeded(&self) -> bool {
        self.state.phase() == RunPhase::Succeeded
    }
}

#[derive(Default)]
struct RunContext {
    scratch: Option<ScratchDir>,
    artifacts: Vec<DownloadedArtifact>,
    uploads: Vec<UploadResult>,
    published: Option<PublishedManifest>,
    report: Option<RunReport>,
    report_path: Option<PathBuf>,
}

/// Drives one end-to-end run: download, upload, publish, report, cleanup.
pub struct JobRunner {
    config: RunConfig,
    services: RunServices,
}

impl JobRunner {
    pub fn new(config: RunConfig, services: RunServices) -> Self {
        Self { config, services }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub async fn run(&self, source: &mut dyn DescriptorSource) -> RunOutcome {
        let log = self.services.log.as_ref();
        log.info("Starting daily image upload process...");

        let mut ctx = RunContext::default();
        let (lock, first_event) = match RunLock::acquire(&self.config.lock_path) {
            Ok(lock) => (
                Some(lock),
                RunEvent::Start {
                    target_count: self.config.target_count,
                },
            ),
            Err(err) => (
                None,
                RunEvent::SetupFailed {
                    message: err.to_string(),
                },
            ),
        };

        if lock.is_some() {
            self.uploader().init().await;
        }

        let (mut state, effects) = update(RunState::new(), first_event);
        let mut pending: VecDeque<Effect> = effects.into();
        while let Some(effect) = pending.pop_front() {
            if let Some(event) = self.execute(effect, &state, &mut ctx, source).await {
                let (next, effects) = update(state, event);
                state = next;
                pending.extend(effects);
            }
        }

        drop(lock);
        RunOutcome {
            state,
            report: ctx.report,
            report_path: ctx.report_path,
        }
    }

    fn uploader(&self) -> StorageUploader {
        StorageUploader::new(
            self.services.store.clone(),
            self.services.log.clone(),
            self.config.gateway_base.clone(),
            self.config.pacing,
            self.config.clock.clone(),
        )
    }

    async fn execute(
        &self,
        effect: Effect,
        state: &RunState,
        ctx: &mut RunContext,
        source: &mut dyn DescriptorSource,
    ) -> Option<RunEvent> {
        let log = self.services.log.as_ref();
        match effect {
            Effect::Download { target_count } => {
                let scratch = match ScratchDir::create(&self.config.scratch_dir) {
                    Ok(scratch) => scratch,
                    Err(err) => {
                        return Some(RunEvent::SetupFailed {
                            message: err.to_string(),
                        })
                    }
                };
                let pipeline = DownloadPipeline::new(
                    self.services.fetcher.clone(),
                    self.services.transformer.clone(),
                    self.services.log.clone(),
                    scratch.path().to_path_buf(),
                    self.config.pacing,
                    self.config.clock.clone(),
                );
                ctx.scratch = Some(scratch);
                let report = pipeline.run(source, target_count).await;
                ctx.artifacts = report.artifacts;
                Some(RunEvent::DownloadsFinished {
                    count: ctx.artifacts.len(),
                })
            }
            Effect::Upload => {
                log.info("Starting upload to storage network...");
                let summary = self.uploader().upload_all(&ctx.artifacts).await;
                ctx.uploads = summary.results;
                Some(RunEvent::UploadsFinished {
                    count: ctx.uploads.len(),
                    insufficient_balance: summary.insufficient_balance > 0,
                })
            }
            Effect::Publish => {
                let builder = ManifestBuilder::new(
                    self.services.store.clone(),
                    self.services.log.clone(),
                    self.config.gateway_base.clone(),
                    self.config.clock.clone(),
                );
                match builder.publish(&ctx.uploads).await {
                    Ok(published) => {
                        let event = RunEvent::Published {
                            manifest_id: published.manifest_id.clone(),
                            gallery_url: published.gallery_url.clone(),
                        };
                        ctx.published = Some(published);
                        Some(event)
                    }
                    Err(err) => {
                        log.error("Failed to publish manifest", Some(&err));
                        Some(RunEvent::PublishFailed {
                            message: err.to_string(),
                            insufficient_balance: err.is_insufficient_balance(),
                        })
                    }
                }
            }
            Effect::WriteReport => {
                self.write_report(state, ctx);
                None
            }
            Effect::ReportFailure { failure } => {
                log.error("Daily upload failed", Some(&failure));
                None
            }
            Effect::FundingHint => {
                log.warn(FUNDING_HINT);
                None
            }
            Effect::Cleanup => {
                if let Some(scratch) = ctx.scratch.take() {
                    match scratch.remove() {
                        Ok(()) => log.info("Temporary files cleaned up"),
                        Err(err) => log.error("Failed to cleanup", Some(&err)),
                    }
                }
                None
            }
        }
    }

    fn write_report(&self, state: &RunState, ctx: &mut RunContext) {
        let log = self.services.log.as_ref();
        let Some(published) = ctx.published.as_ref() else {
            return;
        };

        log.info("Daily upload completed successfully!");
        log.info(&format!("Gallery URL: {}", published.gallery_url));
        log.info(&format!("Manifest ID: {}", published.manifest_id));
        log.info(&format!("Images uploaded: {}", state.uploaded()));

        let report = RunReport {
            date: (self.config.clock)(),
            uploaded_count: state.uploaded(),
            manifest_id: published.manifest_id.clone(),
            gallery_url: published.gallery_url.clone(),
            upload_results: ctx.uploads.clone(),
        };
        match write_report(&self.config.report_dir, &report) {
            Ok(path) => {
                log.info(&format!("Report saved to {}", path.display()));
                ctx.report_path = Some(path);
            }
            Err(err) => log.error("Failed to write run report", Some(&err)),
        }
        ctx.report = Some(report);
    }
}
