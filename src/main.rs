//! # LA Times News
//!
//! Searches latimes.com for a phrase, narrows the results to a topic, and
//! walks the newest-first result pages collecting every article published
//! inside a window of calendar months. Each article's thumbnail is saved to
//! disk and the collected rows are written to one spreadsheet.
//!
//! ## Usage
//!
//! ```sh
//! latimes_news -p "Imran Khan" -c Awards -m 2 -o ./output
//! ```
//!
//! ## Architecture
//!
//! 1. **Configuration**: CLI flags and environment are validated into a
//!    [`config::CrawlConfig`] before the browser starts
//! 2. **Navigation**: a headless Chrome session opens the site, searches,
//!    sorts by newest and ticks the topic filter
//! 3. **Pagination**: result pages are processed until the date window is
//!    exhausted, the page limit is hit or there is no next page
//! 4. **Output**: thumbnails as `article_N.jpeg` plus one `.xlsx` report

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod annotate;
mod cli;
mod config;
mod dates;
mod error;
mod models;
mod outputs;
mod page;
mod pagination;
mod scrapers;
mod session;
mod utils;

use cli::Cli;
use config::CrawlConfig;
use outputs::FileReport;
use scrapers::images::HttpImageFetcher;
use scrapers::latimes::{BrowserSettings, LaTimesDriver};
use session::CrawlSession;
use utils::ensure_writable_dir;

#[tokio::main]
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
    info!("latimes_news starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = match CrawlConfig::from_cli(args, |key| std::env::var(key).ok()) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    // Early check: a bad output path should fail before the browser starts
    if let Err(e) = ensure_writable_dir(&config.output_dir).await {
        error!(
            path = %config.output_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let fetcher = HttpImageFetcher::new(config.wait_timeout)?;
    let driver = LaTimesDriver::launch(&BrowserSettings {
        headless: config.headless,
        wait_timeout: config.wait_timeout,
    })
    .await
    .map_err(|e| {
        error!(error = %e, "Could not start the browser");
        e
    })?;

    let report = FileReport {
        output_dir: config.output_dir.clone(),
        report_name: config.report_name.clone(),
        write_json: config.write_json,
    };
    let report_path = report.report_path();

    let outcome = CrawlSession::new(&config, driver, fetcher, report)
        .run(Local::now().date_naive())
        .await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        articles = outcome.records.len(),
        report = %report_path.display(),
        "Execution complete"
    );

    Ok(())
}
