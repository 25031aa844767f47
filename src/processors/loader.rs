// webthumb/src/processors/loader.rs
use crate::core::{ConvertError, Result, MAX_DIMENSION};
use image::{DynamicImage, GenericImageView, ImageReader};
use std::path::Path;

#[derive(Clone)]
pub struct Loader {
    max_dimension: u32,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            max_dimension: MAX_DIMENSION,
        }
    }

    pub fn load(&self, path: &Path) -> Result<DynamicImage> {
        log::debug!("Loading image from: {}", path.display());

        self.validate_path(path)?;

        let image = ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(ConvertError::Decode)?;

        let (width, height) = image.dimensions();
        if width > self.max_dimension || height > self.max_dimension {
            return Err(ConvertError::ImageTooLarge {
                width,
                height,
                max: self.max_dimension,
            });
        }

        log::debug!(
            "Loaded image: {}x{} pixels, color: {:?}",
            width,
            height,
            image.color()
        );

        Ok(image)
    }

    fn validate_path(&self, path: &Path) -> Result<()> {
        let metadata = path.metadata()?;
        if metadata.len() == 0 {
            return Err(ConvertError::EmptyFile);
        }

        Ok(())
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixel.png");
        image::RgbaImage::new(3, 2).save(&path).unwrap();

        let image = Loader::new().load(&path).unwrap();
        assert_eq!(image.dimensions(), (3, 2));
    }

    #[test]
    fn empty_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");
        std::fs::write(&path, b"").unwrap();

        assert!(matches!(Loader::new().load(&path), Err(ConvertError::EmptyFile)));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"\x89PNG\r\n\x1a\nthis is not a png").unwrap();

        assert!(matches!(Loader::new().load(&path), Err(ConvertError::Decode(_))));
    }

    #[test]
    fn dimension_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.png");
        image::GrayImage::new(20, 10).save(&path).unwrap();

        let result = Loader { max_dimension: 16 }.load(&path);
        assert!(matches!(
            result,
            Err(ConvertError::ImageTooLarge { width: 20, height: 10, .. })
        ));
    }
}
