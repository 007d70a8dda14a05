use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::{FetchSettings, TransformSettings};

pub const DEFAULT_GATEWAY_BASE: &str = "https://gateway.irys.xyz";

/// Attempt budget per run is `target_count * ATTEMPT_MULTIPLIER`.
pub const ATTEMPT_MULTIPLIER: usize = 3;

/// Source of "now"; swapped for a fixed instant in tests.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

/// Sleeps inserted between sequential remote calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub after_download: Duration,
    pub after_skip: Duration,
    pub after_fetch_error: Duration,
    pub after_upload: Duration,
    pub after_upload_error: Duration,
}

impl Pacing {
    pub const fn none() -> Self {
        Self {
            after_download: Duration::ZERO,
            after_skip: Duration::ZERO,
            after_fetch_error: Duration::ZERO,
            after_upload: Duration::ZERO,
            after_upload_error: Duration::ZERO,
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            after_download: Duration::from_secs(1),
            after_skip: Duration::from_millis(500),
            after_fetch_error: Duration::from_secs(2),
            after_upload: Duration::from_secs(4),
            after_upload_error: Duration::from_secs(2),
        }
    }
}

pub(crate) async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

/// Everything one run needs to know. Built per run and never mutated while
/// the run is active.
#[derive(Clone)]
pub struct RunConfig {
    pub target_count: usize,
    pub scratch_dir: PathBuf,
    pub report_dir: PathBuf,
    pub lock_path: PathBuf,
    pub gateway_base: String,
    pub fetch: FetchSettings,
    pub transform: TransformSettings,
    pub pacing: Pacing,
    pub clock: Clock,
}

impl RunConfig {
    /// Same configuration with a different image count.
    pub fn with_target_count(&self, target_count: usize) -> Self {
        Self {
            target_count,
            ..self.clone()
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            target_count: 20,
            scratch_dir: PathBuf::from("./temp_images"),
            report_dir: PathBuf::from("."),
            lock_path: PathBuf::from("./daily-upload.lock"),
            gateway_base: DEFAULT_GATEWAY_BASE.to_string(),
            fetch: FetchSettings::default(),
            transform: TransformSettings::default(),
            pacing: Pacing::default(),
            clock: system_clock(),
        }
    }
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("target_count", &self.target_count)
            .field("scratch_dir", &self.scratch_dir)
            .field("report_dir", &self.report_dir)
            .field("lock_path", &self.lock_path)
            .field("gateway_base", &self.gateway_base)
            .field("fetch", &self.fetch)
            .field("transform", &self.transform)
            .field("pacing", &self.pacing)
            .finish_non_exhaustive()
    }
}

/// `<base>/<path>` with exactly one slash in between.
pub fn gateway_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
