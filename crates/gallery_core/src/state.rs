use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunPhase {
    #[default]
    Init,
    Downloading,
    Uploading,
    Publishing,
    Succeeded,
    Failed,
}

impl RunPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunPhase::Succeeded | RunPhase::Failed)
    }
}

/// Why a run ended in [`RunPhase::Failed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunFailure {
    /// The run could not get started (scratch dir, lock, ...).
    Setup { message: String },
    NoDownloads,
    NoUploads { insufficient_balance: bool },
    Publish {
        message: String,
        insufficient_balance: bool,
    },
}

impl RunFailure {
    /// True when topping up the store balance is the likely fix.
    pub fn needs_funding(&self) -> bool {
        match self {
            RunFailure::NoUploads {
                insufficient_balance,
            }
            | RunFailure::Publish {
                insufficient_balance,
                ..
            } => *insufficient_balance,
            RunFailure::Setup { .. } | RunFailure::NoDownloads => false,
        }
    }
}

impl fmt::Display for RunFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunFailure::Setup { message } => write!(f, "run setup failed: {message}"),
            RunFailure::NoDownloads => write!(f, "no images were downloaded"),
            RunFailure::NoUploads { .. } => write!(f, "no images were uploaded successfully"),
            RunFailure::Publish { message, .. } => {
                write!(f, "manifest publication failed: {message}")
            }
        }
    }
}

impl std::error::Error for RunFailure {}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunState {
    phase: RunPhase,
    target_count: usize,
    downloaded: usize,
    uploaded: usize,
    manifest_id: Option<String>,
    gallery_url: Option<String>,
    failure: Option<RunFailure>,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn target_count(&self) -> usize {
        self.target_count
    }

    pub fn downloaded(&self) -> usize {
        self.downloaded
    }

    pub fn uploaded(&self) -> usize {
        self.uploaded
    }

    pub fn manifest_id(&self) -> Option<&str> {
        self.manifest_id.as_deref()
    }

    pub fn gallery_url(&self) -> Option<&str> {
        self.gallery_url.as_deref()
    }

    pub fn failure(&self) -> Option<&RunFailure> {
        self.failure.as_ref()
    }

    pub(crate) fn begin(&mut self, target_count: usize) {
        self.phase = RunPhase::Downloading;
        self.target_count = target_count;
    }

    pub(crate) fn downloads_done(&mut self, count: usize) {
        self.downloaded = count;
        self.phase = RunPhase::Uploading;
    }

    pub(crate) fn uploads_done(&mut self, count: usize) {
        self.uploaded = count;
        self.phase = RunPhase::Publishing;
    }

    pub(crate) fn succeed(&mut self, manifest_id: String, gallery_url: String) {
        self.manifest_id = Some(manifest_id);
        self.gallery_url = Some(gallery_url);
        self.phase = RunPhase::Succeeded;
    }

    pub(crate) fn fail(&mut self, failure: RunFailure) {
        self.failure = Some(failure);
        self.phase = RunPhase::Failed;
    }
}
