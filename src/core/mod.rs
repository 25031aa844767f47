// webthumb/src/core/mod.rs
pub mod processor;
pub mod report;

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub use processor::ImageProcessor;
pub use report::{BatchReport, FileOutcome, FileStats, LogReporter, Reporter};

/// Largest width or height accepted anywhere in the pipeline.
pub const MAX_DIMENSION: u32 = 100_000;

pub const DEFAULT_INPUT_DIR: &str = "assets/images_master";
pub const DEFAULT_OUTPUT_DIR: &str = "public/images";
pub const DEFAULT_TARGET: TargetSize = TargetSize::new(400, 400);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeAlgorithm {
    Nearest,
    Bilinear,
    Bicubic,
    #[default]
    Lanczos3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Png,
    /// Lossless WebP.
    WebP,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::WebP => "webp",
        }
    }
}

/// Bounding box every output image has to fit into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for TargetSize {
    fn default() -> Self {
        DEFAULT_TARGET
    }
}

impl fmt::Display for TargetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub target: TargetSize,
    /// Lowercase extensions without the leading dot.
    pub extensions: Vec<String>,
    pub format: OutputFormat,
    pub algorithm: ResizeAlgorithm,
    pub optimize: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            target: DEFAULT_TARGET,
            extensions: vec!["png".to_string()],
            format: OutputFormat::Png,
            algorithm: ResizeAlgorithm::Lanczos3,
            optimize: true,
        }
    }
}

impl ConvertConfig {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>, target: TargetSize) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            target,
            ..Default::default()
        }
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| crate::utils::normalize_extension(ext.as_ref()))
            .collect();
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_algorithm(mut self, algorithm: ResizeAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.target.width == 0 || self.target.height == 0 {
            return Err(ConvertError::InvalidParameter(format!(
                "Target size must be positive, got {}",
                self.target
            )));
        }

        crate::utils::validate_dimensions(self.target.width, self.target.height)?;

        if self.extensions.is_empty() {
            return Err(ConvertError::InvalidParameter(
                "At least one input extension is required".to_string(),
            ));
        }

        if self.extensions.iter().any(|ext| ext.is_empty()) {
            return Err(ConvertError::InvalidParameter(
                "Input extensions cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Cannot read input directory {}: {source}", .path.display())]
    InputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot create output directory {}: {source}", .path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File is empty")]
    EmptyFile,

    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Image dimensions {width}x{height} exceed maximum {max}x{max}")]
    ImageTooLarge { width: u32, height: u32, max: u32 },

    #[error("PNG optimization failed: {0}")]
    Optimize(String),
}

impl ConvertError {
    /// Fatal errors stop the whole run instead of a single file.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ConvertError::InvalidParameter(_)
                | ConvertError::InputDirectory { .. }
                | ConvertError::OutputDirectory { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
