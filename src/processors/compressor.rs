// webthumb/src/processors/compressor.rs
use crate::core::{ConvertError, OutputFormat, Result};
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::{ColorType, DynamicImage};
use oxipng::{optimize_from_memory, Options};
use std::borrow::Cow;
use std::path::Path;

/// Lossless encoder for the normalized output formats.
pub struct Compressor {
    optimize_png: bool,
}

impl Compressor {
    pub fn new() -> Self {
        Self { optimize_png: true }
    }

    pub fn with_png_optimization(mut self, optimize: bool) -> Self {
        self.optimize_png = optimize;
        self
    }

    /// Encodes `image` and writes it to `path`, replacing any existing file.
    /// Returns the number of bytes written.
    pub fn save(&self, image: &DynamicImage, path: &Path, format: OutputFormat) -> Result<u64> {
        log::debug!(
            "Saving image to {} as {:?} (optimize: {})",
            path.display(),
            format,
            self.optimize_png
        );

        let data = self.compress_to_bytes(image, format)?;
        std::fs::write(path, &data)?;

        Ok(data.len() as u64)
    }

    pub fn compress_to_bytes(&self, image: &DynamicImage, format: OutputFormat) -> Result<Vec<u8>> {
        match format {
            OutputFormat::Png => self.encode_png(image),
            OutputFormat::WebP => self.encode_webp(image),
        }
    }

    fn encode_png(&self, image: &DynamicImage) -> Result<Vec<u8>> {
        let image = png_compatible(image);

        let mut buffer = Vec::new();
        let encoder = PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, FilterType::Adaptive);
        image.write_with_encoder(encoder)?;

        if self.optimize_png {
            return self.optimize_png_bytes(&buffer);
        }

        Ok(buffer)
    }

    fn encode_webp(&self, image: &DynamicImage) -> Result<Vec<u8>> {
        let image = match image.color() {
            ColorType::Rgb8 | ColorType::Rgba8 => Cow::Borrowed(image),
            _ => Cow::Owned(DynamicImage::ImageRgba8(image.to_rgba8())),
        };

        let mut buffer = Vec::new();
        image.write_with_encoder(WebPEncoder::new_lossless(&mut buffer))?;

        Ok(buffer)
    }

    fn optimize_png_bytes(&self, data: &[u8]) -> Result<Vec<u8>> {
        optimize_from_memory(data, &Options::default())
            .map_err(|e| ConvertError::Optimize(e.to_string()))
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new()
    }
}

// PNG has no float samples.
fn png_compatible(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    match image.color() {
        ColorType::Rgb32F | ColorType::Rgba32F => Cow::Owned(DynamicImage::ImageRgba16(image.to_rgba16())),
        _ => Cow::Borrowed(image),
    }
}
