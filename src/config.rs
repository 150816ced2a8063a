//! Validated crawl configuration.
//!
//! Built once from the parsed [`Cli`] before the browser is launched. All
//! checks happen here, so a missing month count stops the program with a
//! clear message instead of surfacing halfway through a crawl.

use crate::cli::{Cli, DatePolicyArg};
use crate::dates::{compute_date_range, DatePolicy};
use crate::error::{CrawlError, Result};
use crate::models::DateRange;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CATEGORY: &str = "Awards";

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub site_url: String,
    pub search_phrase: String,
    pub category: String,
    pub months: u32,
    pub max_pages: u32,
    pub policy_kind: DatePolicyArg,
    pub output_dir: PathBuf,
    pub report_name: String,
    pub write_json: bool,
    pub wait_timeout: Duration,
    pub headless: bool,
}

impl CrawlConfig {
    /// Validate CLI arguments, consulting `env` for the legacy `CATEGORY`
    /// and `RANGE` variables when the primary ones are unset.
    pub fn from_cli<E>(cli: Cli, env: E) -> Result<Self>
    where
        E: Fn(&str) -> Option<String>,
    {
        let months = match cli.months {
            Some(months) => months,
            None => {
                let raw = env("RANGE").ok_or_else(|| {
                    CrawlError::Config("number of months is required (--months, MONTHS or RANGE)".to_string())
                })?;
                raw.trim().parse::<u32>().map_err(|_| {
                    CrawlError::Config(format!("RANGE must be a whole number of months, got '{}'", raw))
                })?
            }
        };
        if months < 1 {
            return Err(CrawlError::Config("months must be at least 1".to_string()));
        }
        if cli.max_pages < 1 {
            return Err(CrawlError::Config("max pages must be at least 1".to_string()));
        }

        let search_phrase = cli.search_phrase.trim().to_string();
        if search_phrase.is_empty() {
            return Err(CrawlError::Config("search phrase must not be empty".to_string()));
        }

        let category = cli
            .category
            .or_else(|| env("CATEGORY"))
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

        Ok(Self {
            site_url: cli.site_url,
            search_phrase,
            category,
            months,
            max_pages: cli.max_pages,
            policy_kind: cli.date_policy,
            output_dir: PathBuf::from(cli.output_dir),
            report_name: cli.report_name,
            write_json: cli.json,
            wait_timeout: Duration::from_secs(cli.wait_timeout_secs),
            headless: !cli.headful,
        })
    }

    /// The crawl window for a crawl started on `today`.
    pub fn date_range(&self, today: NaiveDate) -> Result<DateRange> {
        compute_date_range(self.months, today)
    }

    /// The date policy for a crawl started on `today`.
    pub fn date_policy(&self, today: NaiveDate) -> Result<DatePolicy> {
        let range = self.date_range(today)?;
        Ok(match self.policy_kind {
            DatePolicyArg::Range => DatePolicy::Range(range),
            DatePolicyArg::Cutoff => DatePolicy::OnOrAfter(range.start),
        })
    }
}
