// webthumb/src/core/report.rs
use super::{ConvertConfig, ConvertError};
use std::path::{Path, PathBuf};

/// What a single successful conversion did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStats {
    pub original_dimensions: (u32, u32),
    pub output_dimensions: (u32, u32),
    pub size_before: u64,
    pub size_after: u64,
}

impl FileStats {
    pub fn was_resized(&self) -> bool {
        self.original_dimensions != self.output_dimensions
    }
}

#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub result: Result<FileStats, ConvertError>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn stats(&self) -> Option<&FileStats> {
        self.result.as_ref().ok()
    }

    pub fn error(&self) -> Option<&ConvertError> {
        self.result.as_ref().err()
    }
}

/// Per-file outcomes of one run, in processing order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: FileOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// Whether a successful conversion already wrote `output` in this run.
    pub fn has_written(&self, output: &Path) -> bool {
        self.outcomes
            .iter()
            .any(|o| o.is_success() && o.output.as_path() == output)
    }

    /// Outputs written more than once, i.e. replaced by a later input that
    /// maps to the same file name.
    pub fn overwritten_outputs(&self) -> Vec<&Path> {
        let mut seen: Vec<&Path> = Vec::new();
        let mut overwritten: Vec<&Path> = Vec::new();
        for outcome in self.outcomes.iter().filter(|o| o.is_success()) {
            let output = outcome.output.as_path();
            if seen.contains(&output) {
                if !overwritten.contains(&output) {
                    overwritten.push(output);
                }
            } else {
                seen.push(output);
            }
        }
        overwritten
    }

    pub fn total_size_before(&self) -> u64 {
        self.outcomes.iter().filter_map(|o| o.stats()).map(|s| s.size_before).sum()
    }

    pub fn total_size_after(&self) -> u64 {
        self.outcomes.iter().filter_map(|o| o.stats()).map(|s| s.size_after).sum()
    }

    /// Size reduction over the successful files, in percent.
    pub fn savings_percent(&self) -> f64 {
        let before = self.total_size_before();
        if before == 0 {
            return 0.0;
        }

        let savings = (before as f64 - self.total_size_after() as f64) / before as f64 * 100.0;
        savings.clamp(0.0, 100.0)
    }
}

/// Receives progress of a batch as it happens.
pub trait Reporter {
    fn on_start(&mut self, _config: &ConvertConfig, _total: usize) {}

    fn on_file(&mut self, outcome: &FileOutcome);

    fn on_finish(&mut self, _report: &BatchReport) {}
}

/// Reporter that forwards every event to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn on_start(&mut self, config: &ConvertConfig, total: usize) {
        log::info!(
            "Converting {} images from {} to {} (target {})",
            total,
            config.input_dir.display(),
            config.output_dir.display(),
            config.target
        );
    }

    fn on_file(&mut self, outcome: &FileOutcome) {
        match &outcome.result {
            Ok(stats) => log::info!(
                "Saved {} ({}x{} -> {}x{})",
                outcome.output.display(),
                stats.original_dimensions.0,
                stats.original_dimensions.1,
                stats.output_dimensions.0,
                stats.output_dimensions.1
            ),
            Err(e) => log::warn!("Error processing {}: {}", outcome.input.display(), e),
        }
    }

    fn on_finish(&mut self, report: &BatchReport) {
        log::info!(
            "Finished: {} converted, {} failed",
            report.succeeded(),
            report.failed()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(name: &str, before: u64, after: u64) -> FileOutcome {
        FileOutcome {
            input: PathBuf::from(format!("in/{name}")),
            output: PathBuf::from(format!("out/{name}")),
            result: Ok(FileStats {
                original_dimensions: (800, 600),
                output_dimensions: (400, 300),
                size_before: before,
                size_after: after,
            }),
        }
    }

    fn failed(name: &str) -> FileOutcome {
        FileOutcome {
            input: PathBuf::from(format!("in/{name}")),
            output: PathBuf::from(format!("out/{name}")),
            result: Err(ConvertError::EmptyFile),
        }
    }

    #[test]
    fn counts_and_sizes() {
        let mut report = BatchReport::new();
        report.push(ok("a.png", 1000, 400));
        report.push(failed("c.png"));
        report.push(ok("b.png", 1000, 600));

        assert_eq!(report.total(), 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.total_size_before(), 2000);
        assert_eq!(report.total_size_after(), 1000);
        assert_eq!(report.savings_percent(), 50.0);

        let failures: Vec<_> = report.failures().map(|o| o.input.clone()).collect();
        assert_eq!(failures, vec![PathBuf::from("in/c.png")]);
    }

    #[test]
    fn repeated_outputs_are_tracked() {
        let mut report = BatchReport::new();
        report.push(ok("a.png", 10, 10));
        assert!(report.has_written(Path::new("out/a.png")));
        assert!(!report.has_written(Path::new("out/b.png")));

        report.push(ok("a.png", 10, 10));
        report.push(failed("b.png"));
        report.push(failed("b.png"));
        assert_eq!(report.overwritten_outputs(), vec![Path::new("out/a.png")]);
    }

    #[test]
    fn empty_report_has_no_savings() {
        let report = BatchReport::new();
        assert_eq!(report.total(), 0);
        assert_eq!(report.savings_percent(), 0.0);
    }

    #[test]
    fn growth_is_clamped_to_zero_savings() {
        let mut report = BatchReport::new();
        report.push(ok("a.png", 100, 300));
        assert_eq!(report.savings_percent(), 0.0);
    }
}
