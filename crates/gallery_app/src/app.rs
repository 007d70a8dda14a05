use std::sync::Arc;

use engine_logging::FacadeLog;
use gallery_core::{ImageCatalog, UrlGenerator};
use gallery_engine::{
    HttpContentStore, JobRunner, JpegTransformer, ReqwestFetcher, RunConfig, RunOutcome,
    RunServices,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::AppConfig;

pub fn catalog(config: &AppConfig) -> ImageCatalog {
    ImageCatalog::with_base_url(&config.image_service_base)
}

fn build_services(config: &AppConfig, run_config: &RunConfig) -> anyhow::Result<RunServices> {
    let fetcher = ReqwestFetcher::new(run_config.fetch.clone())?;
    let store = HttpContentStore::new(config.store_settings())?;
    Ok(RunServices {
        fetcher: Arc::new(fetcher),
        transformer: Arc::new(JpegTransformer::new(run_config.transform)),
        store: Arc::new(store),
        log: Arc::new(FacadeLog),
    })
}

/// One complete run of `target_count` images with fresh services.
pub async fn run_once(config: &AppConfig, target_count: usize) -> anyhow::Result<RunOutcome> {
    let run_config = config.run_config(target_count);
    let services = build_services(config, &run_config)?;
    let mut generator = UrlGenerator::new(catalog(config), StdRng::from_entropy());
    let runner = JobRunner::new(run_config, services);
    Ok(runner.run(&mut generator).await)
}
