//! Application settings loaded from `gallery.ron`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use engine_logging::{engine_info, engine_warn};
use gallery_core::DEFAULT_IMAGE_SERVICE_BASE;
use gallery_engine::{
    system_clock, FetchSettings, HttpStoreSettings, Pacing, RunConfig, TransformSettings,
    DEFAULT_GATEWAY_BASE,
};
use serde::Deserialize;

pub const CONFIG_FILENAME: &str = "gallery.ron";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Every field is optional in the file; missing ones keep their default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub images_per_day: usize,
    pub test_images: usize,
    /// Daily cron expression, `<minute> <hour> * * *`.
    pub schedule: String,
    pub scratch_dir: PathBuf,
    pub log_file: PathBuf,
    pub report_dir: PathBuf,
    pub lock_file: PathBuf,
    pub image_service_base: String,
    pub storage_node: String,
    pub gateway_base: String,
    pub download_timeout_secs: u64,
    pub max_dimension: u32,
    pub jpeg_quality: u8,
    /// Name of the environment variable holding the signing credential.
    pub credential_env: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            images_per_day: 20,
            test_images: 3,
            schedule: "0 9 * * *".to_string(),
            scratch_dir: PathBuf::from("./temp_images"),
            log_file: PathBuf::from("./daily-upload.log"),
            report_dir: PathBuf::from("."),
            lock_file: PathBuf::from("./daily-upload.lock"),
            image_service_base: DEFAULT_IMAGE_SERVICE_BASE.to_string(),
            storage_node: "https://devnet.irys.xyz".to_string(),
            gateway_base: DEFAULT_GATEWAY_BASE.to_string(),
            download_timeout_secs: 15,
            max_dimension: 2048,
            jpeg_quality: 85,
            credential_env: "WALLET_PRIVATE_KEY".to_string(),
        }
    }
}

impl AppConfig {
    /// Reads `path`, or returns defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::parse(path, &content)
    }

    fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        ron::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Per-run engine configuration for a run of `target_count` images.
    pub fn run_config(&self, target_count: usize) -> RunConfig {
        RunConfig {
            target_count,
            scratch_dir: self.scratch_dir.clone(),
            report_dir: self.report_dir.clone(),
            lock_path: self.lock_file.clone(),
            gateway_base: self.gateway_base.clone(),
            fetch: FetchSettings {
                request_timeout: Duration::from_secs(self.download_timeout_secs),
                ..FetchSettings::default()
            },
            transform: TransformSettings {
                max_dimension: self.max_dimension,
                quality: self.jpeg_quality,
            },
            pacing: Pacing::default(),
            clock: system_clock(),
        }
    }

    /// Store settings with the credential read from the environment,
    /// after loading `.env` if present.
    pub fn store_settings(&self) -> HttpStoreSettings {
        dotenvy::dotenv().ok();
        let credential = std::env::var(&self.credential_env)
            .ok()
            .filter(|value| !value.trim().is_empty());
        if credential.is_some() {
            engine_info!("Loaded signing credential from {}", self.credential_env);
        } else {
            engine_warn!(
                "{} is not set; uploads will fail until a credential is provided",
                self.credential_env
            );
        }
        HttpStoreSettings::new(self.storage_node.clone(), credential)
    }
}
