// webthumb/src/processors/resizer.rs
use crate::core::{ResizeAlgorithm, TargetSize};
use image::{imageops::FilterType, DynamicImage, GenericImageView};

/// Downscale-only fit into a bounding box.
pub struct Resizer {
    algorithm: ResizeAlgorithm,
}

impl Resizer {
    pub fn new(algorithm: ResizeAlgorithm) -> Self {
        Self { algorithm }
    }

    pub fn fit_within(&self, image: DynamicImage, target: TargetSize) -> DynamicImage {
        let (orig_width, orig_height) = image.dimensions();
        let (width, height) = Self::calculate_dimensions(orig_width, orig_height, target);

        if width == orig_width && height == orig_height {
            log::debug!("Image already fits {}, skipping resize", target);
            return image;
        }

        log::debug!(
            "Resizing image from {}x{} to {}x{}",
            orig_width,
            orig_height,
            width,
            height
        );

        image.resize_exact(width, height, self.filter_type())
    }

    /// Largest size with the source aspect ratio that fits `target`, never
    /// larger than the source itself.
    pub fn calculate_dimensions(orig_width: u32, orig_height: u32, target: TargetSize) -> (u32, u32) {
        if orig_width == 0 || orig_height == 0 {
            return (orig_width, orig_height);
        }

        let scale = Self::scale_factor(orig_width, orig_height, target);
        if scale >= 1.0 {
            return (orig_width, orig_height);
        }

        let width = (orig_width as f64 * scale).round() as u32;
        let height = (orig_height as f64 * scale).round() as u32;

        (
            width.clamp(1, target.width.max(1)),
            height.clamp(1, target.height.max(1)),
        )
    }

    fn scale_factor(orig_width: u32, orig_height: u32, target: TargetSize) -> f64 {
        let scale_w = target.width as f64 / orig_width as f64;
        let scale_h = target.height as f64 / orig_height as f64;

        scale_w.min(scale_h).min(1.0)
    }

    fn filter_type(&self) -> FilterType {
        match self.algorithm {
            ResizeAlgorithm::Nearest => FilterType::Nearest,
            ResizeAlgorithm::Bilinear => FilterType::Triangle,
            ResizeAlgorithm::Bicubic => FilterType::CatmullRom,
            ResizeAlgorithm::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl Default for Resizer {
    fn default() -> Self {
        Self::new(ResizeAlgorithm::default())
    }
}
