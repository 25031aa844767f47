// webthumb/src/processors/batch.rs
use crate::core::{BatchReport, ConvertConfig, ConvertError, FileOutcome, ImageProcessor, Reporter, Result};
use crate::utils::{generate_output_path, matches_extension};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Converts every matching file of one directory into another, one at a time.
pub struct FolderConverter {
    config: ConvertConfig,
    processor: ImageProcessor,
}

impl FolderConverter {
    pub fn new(config: ConvertConfig) -> Result<Self> {
        config.validate()?;
        let processor = ImageProcessor::new(&config);

        Ok(Self { config, processor })
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Runs the batch. Only directory-level problems are returned as errors;
    /// per-file failures end up in the report.
    pub fn run(&self, reporter: &mut dyn Reporter) -> Result<BatchReport> {
        let input_dir = &self.config.input_dir;
        let output_dir = &self.config.output_dir;

        self.validate_paths(input_dir, output_dir)?;

        let entries = self.collect_entries(input_dir)?;

        std::fs::create_dir_all(output_dir).map_err(|source| ConvertError::OutputDirectory {
            path: output_dir.clone(),
            source,
        })?;

        // A path like `input/new/..` only resolves once it exists.
        if same_directory(input_dir, output_dir)? {
            return Err(same_directory_error());
        }

        if entries.is_empty() {
            log::warn!("No matching image files found in {}", input_dir.display());
        } else {
            log::debug!("Processing {} images from {}", entries.len(), input_dir.display());
        }

        reporter.on_start(&self.config, entries.len());

        let mut report = BatchReport::new();
        for entry in entries {
            let outcome = match entry {
                InputEntry::Image(input_path) => self.convert_file(input_path, output_dir),
                InputEntry::Unreadable(input_path, err) => self.unreadable_file(input_path, output_dir, err),
            };

            if outcome.is_success() && report.has_written(&outcome.output) {
                log::warn!(
                    "{} overwrote the output of an earlier file: {}",
                    outcome.input.display(),
                    outcome.output.display()
                );
            }

            reporter.on_file(&outcome);
            report.push(outcome);
        }

        reporter.on_finish(&report);

        Ok(report)
    }

    fn convert_file(&self, input_path: PathBuf, output_dir: &Path) -> FileOutcome {
        let output_path = generate_output_path(&input_path, output_dir, self.config.format);

        match output_path {
            Ok(output) => {
                let result = self.processor.process(&input_path, &output);
                FileOutcome {
                    input: input_path,
                    output,
                    result,
                }
            }
            Err(e) => FileOutcome {
                output: output_dir.to_path_buf(),
                input: input_path,
                result: Err(e),
            },
        }
    }

    fn unreadable_file(&self, input_path: PathBuf, output_dir: &Path, err: walkdir::Error) -> FileOutcome {
        let output = generate_output_path(&input_path, output_dir, self.config.format)
            .unwrap_or_else(|_| output_dir.to_path_buf());

        FileOutcome {
            input: input_path,
            output,
            result: Err(ConvertError::Io(err.into())),
        }
    }

    /// Entries directly inside `input_dir` with a matching extension, sorted
    /// by file name. Matching entries that cannot be stat'ed (dangling
    /// symlinks) are kept so they show up as failures.
    fn collect_entries(&self, input_dir: &Path) -> Result<Vec<InputEntry>> {
        let walker = WalkDir::new(input_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        let mut entries = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    return Err(ConvertError::InputDirectory {
                        path: input_dir.to_path_buf(),
                        source: err.into(),
                    });
                }
                Err(err) => {
                    match err.path().map(Path::to_path_buf) {
                        Some(path) if matches_extension(&path, &self.config.extensions) => {
                            entries.push(InputEntry::Unreadable(path, err));
                        }
                        _ => log::warn!("Skipping unreadable entry in {}: {}", input_dir.display(), err),
                    }
                    continue;
                }
            };

            if entry.file_type().is_file() && matches_extension(entry.path(), &self.config.extensions) {
                entries.push(InputEntry::Image(entry.into_path()));
            }
        }

        entries.sort_by(|a, b| a.path().file_name().cmp(&b.path().file_name()));

        Ok(entries)
    }

    pub fn validate_paths(&self, input_dir: &Path, output_dir: &Path) -> Result<()> {
        if !input_dir.exists() {
            return Err(ConvertError::InputDirectory {
                path: input_dir.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "directory does not exist"),
            });
        }

        if !input_dir.is_dir() {
            return Err(ConvertError::InputDirectory {
                path: input_dir.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
            });
        }

        if output_dir.exists() && !output_dir.is_dir() {
            return Err(ConvertError::OutputDirectory {
                path: output_dir.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::AlreadyExists, "path exists and is not a directory"),
            });
        }

        // Outputs share the source file names.
        if output_dir.exists() && same_directory(input_dir, output_dir)? {
            return Err(same_directory_error());
        }

        Ok(())
    }
}

enum InputEntry {
    Image(PathBuf),
    Unreadable(PathBuf, walkdir::Error),
}

impl InputEntry {
    fn path(&self) -> &Path {
        match self {
            InputEntry::Image(path) | InputEntry::Unreadable(path, _) => path,
        }
    }
}

fn same_directory_error() -> ConvertError {
    ConvertError::InvalidParameter("Input and output directories cannot be the same".to_string())
}

fn same_directory(a: &Path, b: &Path) -> Result<bool> {
    Ok(std::fs::canonicalize(a)? == std::fs::canonicalize(b)?)
}

/// Converts `input_dir` into `output_dir` with the default filter and format,
/// reporting through `log`.
pub fn convert(
    input_dir: impl Into<PathBuf>,
    output_dir: impl Into<PathBuf>,
    target: crate::core::TargetSize,
) -> Result<BatchReport> {
    let converter = FolderConverter::new(ConvertConfig::new(input_dir, output_dir, target))?;
    converter.run(&mut crate::core::LogReporter)
}
