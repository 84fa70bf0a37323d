//! # britannica_text
//!
//! Builds a plain-text corpus from encyclopedia articles. A list of search
//! queries is turned into article URL fragments, each article is fetched, the
//! text of its `<p>` elements is cleaned up and appended to a single output
//! file.
//!
//! ## Usage
//!
//! ```sh
//! britannica_text -q ./search_queries.json -o ./data/britannica_output.txt
//! ```
//!
//! ## Architecture
//!
//! The job is a single sequential pipeline:
//! 1. **Queries**: Load the JSON array of search terms
//! 2. **URL generation**: Search pages (or a saved fragment list) give up to
//!    `limit` article fragments per query
//! 3. **Scraping**: One GET per fragment; paragraph text is filtered, stripped
//!    of entity codes and appended to the output file

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod driver;
mod extract;
mod fetcher;
mod http;
mod models;
mod output;
mod queries;
mod urls;
mod utils;

use cli::Cli;
use config::{RunConfig, ScrapeConfig};
use http::ReqwestClient;
use models::RunSummary;
use std::path::Path;
use urls::britannica::SearchPages;
use urls::fragment_file::FragmentFile;

#[tokio::main(flavor = "current_thread")]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("britannica_text starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = match load_config(&args).await {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e);
        }
    };
    info!(
        queries = %config.queries_path.display(),
        output = %config.output_path.display(),
        limit = config.limit,
        base_url = %config.base_url,
        "Configuration resolved"
    );

    let client = ReqwestClient::new(config.request_timeout)?;
    let result: Result<RunSummary, Box<dyn Error>> = match &config.fragments_path {
        Some(path) => {
            info!(path = %path.display(), "Using saved URL fragments");
            driver::run(&config, &client, &FragmentFile::new(path)).await
        }
        None => {
            let generator = SearchPages::new(client.clone(), config.search_url.clone());
            driver::run(&config, &client, &generator).await
        }
    };

    let elapsed = start_time.elapsed();
    match result {
        Ok(summary) => {
            info!(
                ?elapsed,
                attempted = summary.attempted,
                written = summary.written,
                skipped = summary.skipped,
                bytes = summary.bytes_written,
                "Execution complete"
            );
            Ok(())
        }
        Err(e) => {
            error!(?elapsed, error = %e, "Run aborted");
            Err(e)
        }
    }
}

/// Merge the optional YAML config file with command-line flags.
async fn load_config(args: &Cli) -> Result<RunConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => ScrapeConfig::load(Path::new(path)).await?,
        None => ScrapeConfig::default(),
    };
    config.apply_cli(args);
    config.validate()
}
