// webthumb/src/utils/mod.rs
use crate::core::{ConvertError, OutputFormat, Result, MAX_DIMENSION};
use std::path::{Path, PathBuf};

/// Output location for `input`: same stem, canonical extension of `format`.
pub fn generate_output_path(input_path: &Path, output_dir: &Path, format: OutputFormat) -> Result<PathBuf> {
    let stem = input_path.file_stem().ok_or_else(|| {
        ConvertError::InvalidParameter(format!("Invalid file name: {}", input_path.display()))
    })?;

    let mut file_name = stem.to_os_string();
    file_name.push(".");
    file_name.push(format.extension());

    Ok(output_dir.join(file_name))
}

pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

/// Case-insensitive extension check against already normalized `extensions`.
pub fn matches_extension(path: &Path, extensions: &[String]) -> bool {
    get_file_extension(path)
        .map(|ext| extensions.iter().any(|allowed| *allowed == ext))
        .unwrap_or(false)
}

pub fn get_file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
}

pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let base = 1024_f64;
    let bytes_f64 = bytes as f64;
    let exponent = ((bytes_f64.log10() / base.log10()).floor() as usize).min(UNITS.len() - 1);
    let size = bytes_f64 / base.powi(exponent as i32);

    format!("{:.2} {}", size, UNITS[exponent])
}

pub fn calculate_aspect_ratio(width: u32, height: u32) -> f32 {
    if height == 0 {
        0.0
    } else {
        width as f32 / height as f32
    }
}

pub fn validate_dimensions(width: u32, height: u32) -> Result<()> {
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(ConvertError::InvalidParameter(format!(
            "Dimensions too large (max {} pixels)",
            MAX_DIMENSION
        )));
    }

    Ok(())
}
