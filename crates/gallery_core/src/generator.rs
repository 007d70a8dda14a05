use rand::Rng;

use crate::catalog::{Dimensions, ImageCatalog, ImageSource, ImageVariant, BLUR_LEVELS, SEED_RANGE};
use crate::ImageDescriptor;

/// Anything that can hand the download pipeline its next request.
pub trait DescriptorSource: Send {
    fn next_descriptor(&mut self) -> ImageDescriptor;
}

/// Picks a random source, category, size and seed from an [`ImageCatalog`].
#[derive(Debug)]
pub struct UrlGenerator<R> {
    catalog: ImageCatalog,
    rng: R,
}

impl<R: Rng> UrlGenerator<R> {
    /// A catalog with no sources, no dimensions, or a source without
    /// categories is replaced by the default catalog.
    pub fn new(catalog: ImageCatalog, rng: R) -> Self {
        let usable = !catalog.sources.is_empty()
            && !catalog.dimensions.is_empty()
            && catalog.sources.iter().all(|s| !s.categories.is_empty());
        let catalog = if usable {
            catalog
        } else {
            ImageCatalog::default()
        };
        Self { catalog, rng }
    }

    pub fn catalog(&self) -> &ImageCatalog {
        &self.catalog
    }

    pub fn generate(&mut self) -> ImageDescriptor {
        let source_idx = self.rng.gen_range(0..self.catalog.sources.len());
        let source = self.catalog.sources[source_idx].clone();
        let category_idx = self.rng.gen_range(0..source.categories.len());
        let category = &source.categories[category_idx];
        let dims_idx = self.rng.gen_range(0..self.catalog.dimensions.len());
        let dimensions = self.catalog.dimensions[dims_idx];
        let seed = self.rng.gen_range(SEED_RANGE);
        let url = self.render_url(&source, dimensions, seed);

        ImageDescriptor {
            category: format!("{category}_{seed}"),
            source_name: source.name,
            dimensions,
            url,
        }
    }

    fn render_url(&mut self, source: &ImageSource, dims: Dimensions, seed: u32) -> String {
        let base = format!(
            "{}/{}/{}?random={seed}",
            source.base_url, dims.width, dims.height
        );
        match source.variant {
            ImageVariant::Plain => base,
            ImageVariant::Grayscale => format!("{base}&grayscale"),
            ImageVariant::Blur => {
                let level = self.rng.gen_range(BLUR_LEVELS);
                format!("{base}&blur={level}")
            }
        }
    }
}

impl<R: Rng + Send> DescriptorSource for UrlGenerator<R> {
    fn next_descriptor(&mut self) -> ImageDescriptor {
        self.generate()
    }
}
