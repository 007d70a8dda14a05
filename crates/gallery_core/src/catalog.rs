use std::ops::Range;

pub const DEFAULT_IMAGE_SERVICE_BASE: &str = "https://picsum.photos";

/// Seeds are drawn uniformly from this range.
pub const SEED_RANGE: Range<u32> = 0..1000;

/// Blur levels accepted by the image service.
pub(crate) const BLUR_LEVELS: std::ops::RangeInclusive<u8> = 1..=5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// URL template a source renders to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageVariant {
    /// `<base>/<w>/<h>?random=<seed>`
    Plain,
    /// `<base>/<w>/<h>?random=<seed>&grayscale`
    Grayscale,
    /// `<base>/<w>/<h>?random=<seed>&blur=<level>`
    Blur,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    pub name: String,
    pub base_url: String,
    pub variant: ImageVariant,
    pub categories: Vec<String>,
}

impl ImageSource {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        variant: ImageVariant,
        categories: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            variant,
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }
}

/// Static choice space the generator samples from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCatalog {
    pub sources: Vec<ImageSource>,
    pub dimensions: Vec<Dimensions>,
}

impl ImageCatalog {
    /// Default catalog pointed at a different image service host.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            sources: default_sources(base_url),
            dimensions: default_dimensions(),
        }
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name.as_str()).collect()
    }
}

impl Default for ImageCatalog {
    fn default() -> Self {
        Self::with_base_url(DEFAULT_IMAGE_SERVICE_BASE)
    }
}

pub fn default_sources(base_url: &str) -> Vec<ImageSource> {
    let base = base_url.trim_end_matches('/');
    vec![
        ImageSource::new(
            "picsum",
            base,
            ImageVariant::Plain,
            (1..=10).map(|n| format!("random{n}")),
        ),
        ImageSource::new("picsum_grayscale", base, ImageVariant::Grayscale, ["grayscale"]),
        ImageSource::new("picsum_blur", base, ImageVariant::Blur, ["blur"]),
    ]
}

pub fn default_dimensions() -> Vec<Dimensions> {
    vec![
        Dimensions::new(800, 600),
        Dimensions::new(1024, 768),
        Dimensions::new(1200, 800),
        Dimensions::new(900, 900),
        Dimensions::new(1080, 1350),
    ]
}
