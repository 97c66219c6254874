#![forbid(unsafe_code)]

mod cli;

use std::path::Path;
use std::process;

use anyhow::Context;
use clap::Parser;
use srcsrv::SourceMap;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::cli::extract::{self, Summary};
use crate::cli::{locate, Cache, Cli, Fetcher};

// Tracing target constants
pub const TRACING_TARGET_RUN: &str = "srcsrv::run";
pub const TRACING_TARGET_FETCH: &str = "srcsrv::fetch";
pub const TRACING_TARGET_CACHE: &str = "srcsrv::cache";
pub const TRACING_TARGET_EXTRACT: &str = "srcsrv::extract";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Err(error) = run(cli).await else {
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_RUN,
            error = %format!("{error:#}"),
            "extraction failed"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let script_url = Url::parse(&cli.url).with_context(|| format!("invalid URL: {}", cli.url))?;
    let fetcher = Fetcher::new(Cache::new(&cli.cache_dir, !cli.no_cache))?;

    let Some(summary) = recover(&fetcher, &script_url, &cli.output).await? else {
        return Ok(());
    };

    tracing::info!(
        target: TRACING_TARGET_RUN,
        output = %cli.output.display(),
        extracted = summary.extracted,
        skipped = summary.skipped,
        "extraction finished"
    );

    Ok(())
}

/// Fetches the script, follows its source map reference and writes every
/// recovered source below `output`.
///
/// Returns `None` without touching `output` if the script names no source
/// map. A source map that fails to parse leaves `output` untouched as well.
async fn recover(
    fetcher: &Fetcher,
    script_url: &Url,
    output: &Path,
) -> anyhow::Result<Option<Summary>> {
    tracing::debug!(target: TRACING_TARGET_RUN, url = %script_url, "fetching script");
    let script = fetcher.fetch_text(script_url).await?;

    let Some(reference) = locate::source_mapping_url(&script) else {
        tracing::error!(target: TRACING_TARGET_RUN, url = %script_url, "no source map URL found");
        return Ok(None);
    };
    let map_url = script_url
        .join(reference)
        .with_context(|| format!("invalid source map URL: {reference}"))?;

    tracing::debug!(target: TRACING_TARGET_RUN, url = %map_url, "fetching source map");
    let map = fetcher.fetch_text(&map_url).await?;

    tracing::debug!(target: TRACING_TARGET_RUN, "building files");
    let source_map =
        SourceMap::parse(&map).with_context(|| format!("failed to parse source map {map_url}"))?;
    let files = source_map
        .sources()
        .iter()
        .flatten()
        .map(|source| Ok((source.as_str(), source_map.source_content_for(source, true)?)))
        .collect::<srcsrv::Result<Vec<_>>>()?;

    extract::clear(output).await?;
    let summary = extract::write_files(&files, output).await?;

    Ok(Some(summary))
}

/// Initializes tracing; `RUST_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
