// webthumb/src/core/processor.rs
use super::{ConvertConfig, FileStats, OutputFormat, Result, TargetSize};
use crate::processors::{Compressor, Loader, Resizer};
use image::GenericImageView;
use std::path::Path;

/// Decode, fit into the target box and re-encode a single file.
pub struct ImageProcessor {
    target: TargetSize,
    format: OutputFormat,
    loader: Loader,
    resizer: Resizer,
    compressor: Compressor,
}

impl ImageProcessor {
    pub fn new(config: &ConvertConfig) -> Self {
        Self {
            target: config.target,
            format: config.format,
            loader: Loader::new(),
            resizer: Resizer::new(config.algorithm),
            compressor: Compressor::new().with_png_optimization(config.optimize),
        }
    }

    pub fn process<P: AsRef<Path>, Q: AsRef<Path>>(&self, input_path: P, output_path: Q) -> Result<FileStats> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        let size_before = std::fs::metadata(input_path)?.len();

        let image = self.loader.load(input_path)?;
        let original_dimensions = image.dimensions();

        let image = self.resizer.fit_within(image, self.target);
        let output_dimensions = image.dimensions();

        let size_after = self.compressor.save(&image, output_path, self.format)?;

        Ok(FileStats {
            original_dimensions,
            output_dimensions,
            size_before,
            size_after,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConvertError;

    #[test]
    fn downscales_and_writes() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("wide.png");
        let output = dir.path().join("out.png");
        image::RgbImage::from_pixel(800, 600, image::Rgb([200, 40, 40]))
            .save(&input)
            .unwrap();

        let processor = ImageProcessor::new(&ConvertConfig::default());
        let stats = processor.process(&input, &output).unwrap();

        assert_eq!(stats.original_dimensions, (800, 600));
        assert_eq!(stats.output_dimensions, (400, 300));
        assert!(stats.was_resized());
        assert_eq!(stats.size_after, std::fs::metadata(&output).unwrap().len());
        assert_eq!(image::image_dimensions(&output).unwrap(), (400, 300));
    }

    #[test]
    fn missing_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let processor = ImageProcessor::new(&ConvertConfig::default());

        let result = processor.process(dir.path().join("nonexistent.png"), dir.path().join("out.png"));

        assert!(matches!(result, Err(ConvertError::Io(_))));
        assert!(!dir.path().join("out.png").exists());
    }
}
