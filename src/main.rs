use anyhow::{bail, Context};
use clap::Parser;
use log::LevelFilter;
use webthumb::{Cli, ConsoleReporter, FolderConverter};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .parse_default_env()
        .init();

    let config = cli.to_config();
    let converter = FolderConverter::new(config).context("Invalid configuration")?;

    let mut reporter = ConsoleReporter::new(!cli.no_progress);
    let report = converter.run(&mut reporter).with_context(|| {
        format!(
            "Failed to convert {} into {}",
            converter.config().input_dir.display(),
            converter.config().output_dir.display()
        )
    })?;

    if cli.should_fail(&report) {
        bail!("{} of {} images failed", report.failed(), report.total());
    }

    Ok(())
}
