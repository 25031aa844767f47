// webthumb/src/cli.rs
use crate::core::{
    BatchReport, ConvertConfig, FileOutcome, OutputFormat, Reporter, ResizeAlgorithm, TargetSize,
    DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR, DEFAULT_TARGET,
};
use crate::utils::format_file_size;
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "webthumb", version, about = "Batch-convert a folder of images into web thumbnails")]
pub struct Cli {
    /// Directory with the source images
    #[arg(short, long, default_value = DEFAULT_INPUT_DIR)]
    pub input: PathBuf,

    /// Directory the thumbnails are written to (created if missing)
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// Maximum width in pixels
    #[arg(long, default_value_t = DEFAULT_TARGET.width)]
    pub width: u32,

    /// Maximum height in pixels
    #[arg(long, default_value_t = DEFAULT_TARGET.height)]
    pub height: u32,

    /// Input extensions to pick up, comma separated
    #[arg(short = 'e', long = "ext", value_delimiter = ',', default_value = "png")]
    pub extensions: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Png)]
    pub format: Format,

    /// Resampling filter
    #[arg(short, long, value_enum, default_value_t = Algorithm::Lanczos3)]
    pub algorithm: Algorithm,

    /// Skip the oxipng pass on PNG output
    #[arg(long)]
    pub no_optimize: bool,

    /// Do not draw a progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Exit with an error if any file failed
    #[arg(long)]
    pub strict: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn to_config(&self) -> ConvertConfig {
        ConvertConfig::new(
            self.input.clone(),
            self.output.clone(),
            TargetSize::new(self.width, self.height),
        )
        .with_extensions(&self.extensions)
        .with_format(self.format.into())
        .with_algorithm(self.algorithm.into())
        .with_optimize(!self.no_optimize)
    }

    /// Per-file failures only fail the process under `--strict`.
    pub fn should_fail(&self, report: &BatchReport) -> bool {
        self.strict && report.failed() > 0
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    Nearest,
    Bilinear,
    Bicubic,
    Lanczos3,
}

impl From<Algorithm> for ResizeAlgorithm {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Nearest => ResizeAlgorithm::Nearest,
            Algorithm::Bilinear => ResizeAlgorithm::Bilinear,
            Algorithm::Bicubic => ResizeAlgorithm::Bicubic,
            Algorithm::Lanczos3 => ResizeAlgorithm::Lanczos3,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Png,
    Webp,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Png => OutputFormat::Png,
            Format::Webp => OutputFormat::WebP,
        }
    }
}

/// Human-readable rendering of a batch, on stdout by default, with an
/// optional progress bar on stderr.
pub struct ConsoleReporter<W: Write = io::Stdout> {
    out: W,
    show_progress: bool,
    progress: Option<ProgressBar>,
}

impl ConsoleReporter {
    pub fn new(show_progress: bool) -> Self {
        Self::with_writer(io::stdout(), show_progress)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn with_writer(out: W, show_progress: bool) -> Self {
        Self {
            out,
            show_progress,
            progress: None,
        }
    }

    // Lines go through the bar so they don't tear it.
    fn print(&mut self, line: String) {
        let out = &mut self.out;
        let result = match &self.progress {
            Some(pb) => pb.suspend(|| writeln!(out, "{}", line)),
            None => writeln!(out, "{}", line),
        };

        if let Err(e) = result {
            log::warn!("Failed to write progress line: {}", e);
        }
    }

    fn create_progress_bar(total: usize) -> ProgressBar {
        let pb = ProgressBar::new(total as u64);
        let style = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        )
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        pb
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn on_start(&mut self, config: &ConvertConfig, total: usize) {
        self.print("Starting image resizing...".to_string());
        self.print(format!("Target size: {}", config.target));
        self.print(format!(
            "Images: {} -> {} ({} found)",
            config.input_dir.display(),
            config.output_dir.display(),
            total
        ));

        if self.show_progress && total > 0 {
            self.progress = Some(Self::create_progress_bar(total));
        }
    }

    fn on_file(&mut self, outcome: &FileOutcome) {
        let line = match &outcome.result {
            Ok(stats) => format!(
                "Resized & saved: {} ({}x{} -> {}x{}, {})",
                outcome.output.display(),
                stats.original_dimensions.0,
                stats.original_dimensions.1,
                stats.output_dimensions.0,
                stats.output_dimensions.1,
                format_file_size(stats.size_after)
            ),
            Err(e) => format!("Error processing {}: {}", outcome.input.display(), e),
        };
        self.print(line);

        if let Some(pb) = &self.progress {
            pb.inc(1);
        }
    }

    fn on_finish(&mut self, report: &BatchReport) {
        if let Some(pb) = self.progress.take() {
            pb.finish_and_clear();
        }

        if report.failed() == 0 {
            self.print(format!("All {} images resized & saved!", report.succeeded()));
        } else {
            self.print(format!(
                "Finished with errors: {} saved, {} failed",
                report.succeeded(),
                report.failed()
            ));
        }
        self.print(format!(
            "Total size: {} -> {} ({:.1}% smaller)",
            format_file_size(report.total_size_before()),
            format_file_size(report.total_size_after()),
            report.savings_percent()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ConvertError, FileStats};

    #[test]
    fn defaults_match_original_constants() {
        let cli = Cli::parse_from(["webthumb"]);
        let config = cli.to_config();

        assert_eq!(config.input_dir, PathBuf::from("assets/images_master"));
        assert_eq!(config.output_dir, PathBuf::from("public/images"));
        assert_eq!(config.target, TargetSize::new(400, 400));
        assert_eq!(config.extensions, vec!["png".to_string()]);
        assert_eq!(config.format, OutputFormat::Png);
        assert_eq!(config.algorithm, ResizeAlgorithm::Lanczos3);
        assert!(config.optimize);
        assert!(!cli.strict);
    }

    #[test]
    fn flags_map_into_config() {
        let cli = Cli::parse_from([
            "webthumb", "-i", "src", "-o", "dst", "--width", "200", "--height", "100", "--ext", "PNG,.jpg",
            "--format", "webp", "--algorithm", "bicubic", "--no-optimize", "--strict",
        ]);
        let config = cli.to_config();

        assert_eq!(config.input_dir, PathBuf::from("src"));
        assert_eq!(config.output_dir, PathBuf::from("dst"));
        assert_eq!(config.target, TargetSize::new(200, 100));
        assert_eq!(config.extensions, vec!["png".to_string(), "jpg".to_string()]);
        assert_eq!(config.format, OutputFormat::WebP);
        assert_eq!(config.algorithm, ResizeAlgorithm::Bicubic);
        assert!(!config.optimize);
        assert!(cli.strict);
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Cli::try_parse_from(["webthumb", "--format", "gif"]).is_err());
    }

    fn sample_report() -> BatchReport {
        let mut report = BatchReport::new();
        report.push(FileOutcome {
            input: PathBuf::from("in/a.png"),
            output: PathBuf::from("out/a.png"),
            result: Ok(FileStats {
                original_dimensions: (800, 600),
                output_dimensions: (400, 300),
                size_before: 2048,
                size_after: 1024,
            }),
        });
        report.push(FileOutcome {
            input: PathBuf::from("in/c.png"),
            output: PathBuf::from("out/c.png"),
            result: Err(ConvertError::EmptyFile),
        });
        report
    }

    #[test]
    fn console_output_has_banners_and_a_line_per_file() {
        let config = ConvertConfig::new("in", "out", TargetSize::new(400, 400));
        let report = sample_report();

        let mut buffer = Vec::new();
        {
            let mut reporter = ConsoleReporter::with_writer(&mut buffer, false);
            reporter.on_start(&config, report.total());
            for outcome in &report.outcomes {
                reporter.on_file(outcome);
            }
            reporter.on_finish(&report);
        }
        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "Starting image resizing...");
        assert_eq!(lines[1], "Target size: 400x400");
        assert_eq!(lines[2], "Images: in -> out (2 found)");
        assert_eq!(lines[3], "Resized & saved: out/a.png (800x600 -> 400x300, 1.00 KB)");
        assert_eq!(lines[4], "Error processing in/c.png: File is empty");
        assert_eq!(lines[5], "Finished with errors: 1 saved, 1 failed");
        assert_eq!(lines[6], "Total size: 2.00 KB -> 1.00 KB (50.0% smaller)");
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn clean_batch_gets_success_banner() {
        let mut report = sample_report();
        report.outcomes.pop();

        let mut buffer = Vec::new();
        ConsoleReporter::with_writer(&mut buffer, false).on_finish(&report);

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.starts_with("All 1 images resized & saved!\n"));
    }

    #[test]
    fn failures_only_fail_the_process_when_strict() {
        let report = sample_report();

        let lenient = Cli::parse_from(["webthumb"]);
        assert!(!lenient.should_fail(&report));

        let strict = Cli::parse_from(["webthumb", "--strict"]);
        assert!(strict.should_fail(&report));

        let mut clean = sample_report();
        clean.outcomes.pop();
        assert!(!strict.should_fail(&clean));
    }
}
