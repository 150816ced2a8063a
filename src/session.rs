//! One end-to-end crawl.
//!
//! [`CrawlSession`] owns the configuration and borrows a [`NewsDriver`], an
//! [`ImageFetcher`] and a [`ReportSink`]. [`CrawlSession::run`] performs the
//! steps strictly in order:
//!
//! 1. open the site
//! 2. search the phrase
//! 3. sort newest first
//! 4. tick the category
//! 5. paginate until done, exporting the report once
//!
//! Only a failure to open the site ends the crawl early. Search, sort and
//! category failures are logged and the crawl continues with whatever page
//! the browser is showing, so the report is still exported once. The
//! driver is closed afterwards whether or not the steps succeeded.

use crate::config::CrawlConfig;
use crate::error::Result;
use crate::page::PageProcessor;
use crate::pagination::{CrawlOutcome, Paginator, ReportSink};
use crate::scrapers::{ImageFetcher, NewsDriver};
use chrono::NaiveDate;
use tracing::{error, info, instrument, warn};

pub struct CrawlSession<'a, D, F, S> {
    config: &'a CrawlConfig,
    driver: D,
    fetcher: F,
    sink: S,
}

impl<'a, D, F, S> CrawlSession<'a, D, F, S>
where
    D: NewsDriver,
    F: ImageFetcher,
    S: ReportSink,
{
    pub fn new(config: &'a CrawlConfig, driver: D, fetcher: F, sink: S) -> Self {
        Self {
            config,
            driver,
            fetcher,
            sink,
        }
    }

    /// Run the crawl for `today`, then close the driver.
    #[instrument(level = "info", skip(self), fields(phrase = %self.config.search_phrase, category = %self.config.category))]
    pub async fn run(mut self, today: NaiveDate) -> Result<CrawlOutcome> {
        let outcome = self.crawl(today).await;

        if let Err(e) = self.driver.close().await {
            warn!(error = %e, "Browser teardown failed");
        }

        match &outcome {
            Ok(outcome) => info!(
                records = outcome.records.len(),
                pages = outcome.pages_processed,
                stop_reason = ?outcome.stop_reason,
                "Crawl complete"
            ),
            Err(e) => error!(error = %e, "Crawl aborted"),
        }
        outcome
    }

    async fn crawl(&mut self, today: NaiveDate) -> Result<CrawlOutcome> {
        let config = self.config;
        let policy = config.date_policy(today)?;
        info!(?policy, months = config.months, "Crawl window");

        self.driver.open(&config.site_url).await?;
        if let Err(e) = self.driver.search(&config.search_phrase).await {
            warn!(error = %e, phrase = %config.search_phrase, "Search failed; continuing with current page");
        }

        if let Err(e) = self.driver.sort_newest().await {
            warn!(error = %e, "Could not sort by newest; continuing with site order");
        }
        if let Err(e) = self.driver.select_category(&config.category).await {
            warn!(error = %e, category = %config.category, "Could not select category; continuing unfiltered");
        }

        let processor = PageProcessor {
            search_phrase: &config.search_phrase,
            policy,
            today,
            image_dir: &config.output_dir,
            fetcher: &self.fetcher,
        };

        Paginator::new(config.max_pages)
            .run(&mut self.driver, &processor, &mut self.sink)
            .await
    }
}
