mod cli;
mod core;
mod processors;
mod utils;

pub use cli::{Algorithm, Cli, ConsoleReporter, Format};
pub use self::core::{
    BatchReport, ConvertConfig, ConvertError, FileOutcome, FileStats,
    ImageProcessor, LogReporter, OutputFormat, Reporter, ResizeAlgorithm, Result, TargetSize,
    DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR, DEFAULT_TARGET, MAX_DIMENSION,
};
pub use processors::{convert, Compressor, FolderConverter, Loader, Resizer};
pub use utils::{
    calculate_aspect_ratio, format_file_size, generate_output_path, matches_extension,
    validate_dimensions,
};

