use crate::config::ConvertOptions;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for `pipfile2req`.
#[derive(Debug, Parser)]
#[command(
    name = "pipfile2req",
    version,
    about = "Convert Pipfile/Pipfile.lock to requirements.txt",
    long_about = "Converts the packages of a Pipfile or Pipfile.lock into pip requirement \
                  lines printed to standard output. Without FILE, Pipfile.lock is tried \
                  first, then Pipfile."
)]
pub struct Cli {
    /// Project root to look for the manifest in.
    #[arg(short, long, default_value = ".", env = "PIPFILE2REQ_PROJECT")]
    pub project: PathBuf,

    /// Include artifact hashes (Pipfile.lock only).
    #[arg(long)]
    pub hashes: bool,

    /// Convert the development packages instead of the default ones.
    #[arg(short, long)]
    pub dev: bool,

    /// Append --index-url / --extra-index-url lines for the declared sources.
    #[arg(short, long)]
    pub sources: bool,

    /// Enable debug logging on stderr.
    #[arg(short, long)]
    pub verbose: bool,

    /// Pipfile or Pipfile.lock to convert, relative to the current directory.
    pub file: Option<PathBuf>,
}

impl Cli {
    pub fn options(&self) -> ConvertOptions {
        ConvertOptions {
            hashes: self.hashes,
            dev: self.dev,
            sources: self.sources,
        }
    }
}
