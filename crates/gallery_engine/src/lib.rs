//! Gallery engine: fetch, transform, upload and publish, plus the effect
//! executor that drives a run.
mod config;
mod fetch;
mod gallery;
mod manifest;
mod persist;
mod pipeline;
mod runner;
mod store;
mod transform;
mod types;
mod uploader;

pub use config::{
    gateway_url, system_clock, Clock, Pacing, RunConfig, ATTEMPT_MULTIPLIER, DEFAULT_GATEWAY_BASE,
};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher, DEFAULT_USER_AGENT};
pub use gallery::{render_gallery_html, GALLERY_FILENAME};
pub use manifest::{
    Manifest, ManifestBuilder, ManifestEntry, ManifestIndex, PublishError, PublishedManifest,
    MANIFEST_CONTENT_TYPE,
};
pub use persist::{
    ensure_output_dir, report_filename, write_report, AtomicFileWriter, PersistError, RunLock,
    ScratchDir,
};
pub use pipeline::{DownloadPipeline, DownloadReport};
pub use runner::{JobRunner, RunOutcome, RunServices};
pub use store::{ContentStore, HttpContentStore, HttpStoreSettings, StoreError, Tag, TAGS_HEADER};
pub use transform::{JpegTransformer, TransformError, TransformSettings, Transformer};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};
pub use uploader::{StorageUploader, UploadSummary, FUNDING_HINT, UPLOAD_TYPE_TAG};
