use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use lifeprint_common::observability::{LogConfig, init_logging};

mod cli;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = LogConfig {
        log_dir: cli.log_dir.clone(),
        emit_stderr: cli.verbose,
        format: cli.log_format,
        ..LogConfig::default()
    };
    // The index can still be built without a log file.
    if let Err(err) = init_logging(log_config) {
        eprintln!("[warn] file logging disabled: {err:#}");
    }

    let settings = cli.load_settings().context("failed to load settings")?;
    let job = cli.into_job(settings);
    tracing::info!(
        input = %job.input.display(),
        strategy = %job.extract.strategy,
        container = %job.extract.container_id,
        "app.start"
    );

    let stdout = io::stdout();
    let stderr = io::stderr();
    lifeprint_extract::run(&job, &mut stdout.lock(), &mut stderr.lock())
        .with_context(|| format!("failed to build index from {}", job.input.display()))?;
    Ok(())
}
