mod app;
mod config;
mod logging;
mod scheduler;

use std::path::PathBuf;

use clap::Parser;
use engine_logging::engine_info;

use crate::config::{AppConfig, CONFIG_FILENAME};

#[derive(Parser)]
#[command(name = "gallery")]
#[command(about = "Uploads a daily gallery of random images", long_about = None)]
struct Cli {
    /// Run once with the small test image count
    #[arg(long, conflicts_with = "schedule")]
    test: bool,
    /// Keep running and upload once a day on the configured schedule
    #[arg(long)]
    schedule: bool,
    /// Settings file (defaults apply when it does not exist)
    #[arg(long, default_value = CONFIG_FILENAME)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?;
    logging::initialize(&config.log_file);

    if cli.schedule {
        return scheduler::run_scheduled(&config).await;
    }

    let target_count = if cli.test {
        engine_info!("Running in test mode ({} images)", config.test_images);
        config.test_images
    } else {
        config.images_per_day
    };

    let outcome = app::run_once(&config, target_count).await?;
    if let Some(failure) = outcome.state.failure() {
        anyhow::bail!("daily upload failed: {failure}");
    }
    Ok(())
}
