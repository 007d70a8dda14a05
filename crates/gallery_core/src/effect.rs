use crate::RunFailure;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Download { target_count: usize },
    Upload,
    Publish,
    WriteReport,
    ReportFailure { failure: RunFailure },
    FundingHint,
    /// Always the last effect of a run.
    Cleanup,
}
