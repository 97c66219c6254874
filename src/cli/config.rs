use std::path::PathBuf;

use clap::Parser;

/// Fetch and extract source files from a source map.
///
/// All options can also be provided via environment variables.
///
/// # Example
///
/// ```bash
/// srcsrv https://example.com/main.js
/// srcsrv https://example.com/main.js -o ./output
/// srcsrv https://example.com/main.js --no-cache
/// ```
#[derive(Debug, Clone, Parser)]
#[command(name = "srcsrv")]
#[command(about = "Fetch and extract source files from a source map")]
#[command(version)]
pub struct Cli {
    /// URL of the built script whose source map should be extracted.
    pub url: String,

    /// Output directory. Removed and recreated on every run.
    #[arg(short, long, env = "SRCSRV_OUTPUT", default_value = "./.output")]
    pub output: PathBuf,

    /// Disable cache. Requests are cached by default.
    #[arg(short = 'n', long)]
    pub no_cache: bool,

    /// Directory holding cached responses.
    #[arg(long, env = "SRCSRV_CACHE_DIR", default_value = ".cache")]
    pub cache_dir: PathBuf,

    /// Log every extracted and skipped file.
    #[arg(short, long)]
    pub verbose: bool,
}
