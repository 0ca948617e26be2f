//! `skypatch` -- converts the custom skies of a legacy resource pack.
//!
//! # Usage
//!
//! ```bash
//! # Convert an unpacked pack into a new output directory
//! skypatch --input packs/legacy --output packs/converted
//!
//! # Non-standard layout, with debug logging
//! skypatch --input packs/legacy --output packs/converted --config sky.json --verbose
//! ```
//!
//! Entry failures are logged, printed to stdout as a JSON report and turn
//! the exit status into a failure; every entry that converted is still
//! written.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use skypatch_pack::store::DirectoryStore;
use skypatch_sky::prelude::*;

#[derive(Parser)]
#[command(name = "skypatch")]
#[command(version)]
#[command(about = "Convert legacy custom-sky definitions to fabricskyboxes manifests")]
struct Cli {
    /// Root of the unpacked input pack (the directory holding `assets/`)
    #[arg(long, short)]
    input: PathBuf,

    /// Root of the output pack; created if missing
    #[arg(long, short)]
    output: PathBuf,

    /// JSON file overriding the default naming contract
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_ref())?;
    anyhow::ensure!(
        cli.input.is_dir(),
        "input pack {} is not a directory",
        cli.input.display()
    );

    let input = DirectoryStore::new(cli.input.clone());
    let mut output = DirectoryStore::new(cli.output.clone());
    let mut converters: Vec<Box<dyn Converter>> = vec![Box::new(SkyConverter::new(config))];

    let mut report = FailureReport::new();
    for converter in &mut converters {
        tracing::info!(converter = converter.name(), input = %cli.input.display(), "running converter");
        report.merge(converter.convert(&input));
    }
    let mut written = 0;
    for converter in &mut converters {
        written += converter
            .close(&mut output)
            .with_context(|| format!("writing output pack {}", cli.output.display()))?;
    }
    tracing::info!(written, failed = report.len(), output = %cli.output.display(), "done");

    if report.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("serializing failure report")?
    );
    Ok(ExitCode::FAILURE)
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<SkyConfig> {
    let Some(path) = path else {
        return Ok(SkyConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: SkyConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    tracing::debug!(?config, "loaded config");
    Ok(config)
}
