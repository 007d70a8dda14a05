/// Outcomes reported back to the state machine by the effect executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    /// Kick off a run for `target_count` images.
    Start { target_count: usize },
    /// Something outside the pipeline broke before the run could proceed.
    SetupFailed { message: String },
    DownloadsFinished { count: usize },
    UploadsFinished {
        count: usize,
        /// At least one upload was refused for lack of funds.
        insufficient_balance: bool,
    },
    Published {
        manifest_id: String,
        gallery_url: String,
    },
    PublishFailed {
        message: String,
        insufficient_balance: bool,
    },
}
