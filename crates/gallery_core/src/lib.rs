//! Gallery core: data model, image catalog, and the pure run state machine.
mod catalog;
mod effect;
mod generator;
mod msg;
mod state;
mod types;
mod update;

pub use catalog::{
    default_dimensions, default_sources, Dimensions, ImageCatalog, ImageSource, ImageVariant,
    DEFAULT_IMAGE_SERVICE_BASE, SEED_RANGE,
};
pub use effect::Effect;
pub use generator::{DescriptorSource, UrlGenerator};
pub use msg::RunEvent;
pub use state::{RunFailure, RunPhase, RunState};
pub use types::{DownloadedArtifact, ImageDescriptor, RunReport, UploadResult};
pub use update::update;
