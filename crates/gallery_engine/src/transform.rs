use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformSettings {
    /// Longest allowed edge; larger images are scaled down to fit.
    pub max_dimension: u32,
    /// JPEG quality, 1..=100.
    pub quality: u8,
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self {
            max_dimension: 2048,
            quality: 85,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("failed to read image: {0}")]
    Read(#[source] std::io::Error),
    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
}

pub trait Transformer: Send + Sync {
    fn transform(&self, bytes: &[u8]) -> Result<Vec<u8>, TransformError>;
}

/// Shrinks to fit a bounding square and re-encodes as JPEG.
#[derive(Debug, Default, Clone, Copy)]
pub struct JpegTransformer {
    settings: TransformSettings,
}

impl JpegTransformer {
    pub fn new(settings: TransformSettings) -> Self {
        Self { settings }
    }

    fn fit(&self, img: DynamicImage) -> DynamicImage {
        let max = self.settings.max_dimension.max(1);
        if img.width() <= max && img.height() <= max {
            return img;
        }
        // resize() keeps the aspect ratio and fits within max x max.
        img.resize(max, max, FilterType::Lanczos3)
    }
}

impl Transformer for JpegTransformer {
    fn transform(&self, bytes: &[u8]) -> Result<Vec<u8>, TransformError> {
        let img = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(TransformError::Read)?
            .decode()
            .map_err(TransformError::Decode)?;

        // JPEG has no alpha channel.
        let rgb = DynamicImage::ImageRgb8(self.fit(img).to_rgb8());

        let mut out = Cursor::new(Vec::new());
        let quality = self.settings.quality.clamp(1, 100);
        rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut out, quality))
            .map_err(TransformError::Encode)?;
        Ok(out.into_inner())
    }
}
