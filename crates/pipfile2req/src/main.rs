use anyhow::{Context, Result};
use clap::Parser;
use pipfile2req::cli::Cli;
use pipfile2req::convert::convert_pipfile_or_lock;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let conversion = convert_pipfile_or_lock(&cli.project, cli.file.as_deref(), &cli.options())
        .context("failed to convert manifest")?;

    for diagnostic in &conversion.diagnostics {
        tracing::warn!("{}", diagnostic);
    }

    let mut stdout = io::stdout().lock();
    for line in &conversion.lines {
        writeln!(stdout, "{line}").context("failed to write output")?;
    }

    Ok(())
}
