//! Command-line interface definitions.
//!
//! Every option can be given as a flag or through the environment, so the
//! crawler can run unattended from a scheduler that only sets variables.

use crate::pagination::DEFAULT_MAX_PAGES;
use clap::{Parser, ValueEnum};

/// How publish dates are matched against the crawl window.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatePolicyArg {
    /// Keep articles between the first day of the window and the end of this month.
    Range,
    /// Keep every article on or after the first day of the window.
    Cutoff,
}

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Two months of "Imran Khan" articles under "Awards"
/// latimes_news --months 2
///
/// # Same, configured through the environment
/// SEARCH_PHRASE="climate" NEWS_CATEGORY="World & Nation" MONTHS=1 latimes_news
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Phrase typed into the site search
    #[arg(short = 'p', long, env = "SEARCH_PHRASE", default_value = "Imran Khan")]
    pub search_phrase: String,

    /// Topic filter to tick (falls back to $CATEGORY, then "Awards")
    #[arg(short, long, env = "NEWS_CATEGORY")]
    pub category: Option<String>,

    /// Number of calendar months to collect, counting the current one (falls back to $RANGE)
    #[arg(short, long, env = "MONTHS")]
    pub months: Option<u32>,

    /// Stop after this many result pages
    #[arg(long, env = "MAX_PAGES", default_value_t = DEFAULT_MAX_PAGES)]
    pub max_pages: u32,

    /// Directory for downloaded images and the report
    #[arg(short, long, env = "OUTPUT_DIR", default_value = "output")]
    pub output_dir: String,

    /// Spreadsheet file name inside the output directory
    #[arg(long, env = "REPORT_NAME", default_value = "los-angeles-times.xlsx")]
    pub report_name: String,

    /// How article dates are matched against the window
    #[arg(long, value_enum, default_value_t = DatePolicyArg::Range)]
    pub date_policy: DatePolicyArg,

    /// Seconds to wait for a page element before giving up
    #[arg(long, default_value_t = 30)]
    pub wait_timeout_secs: u64,

    /// Site front page
    #[arg(long, env = "NEWS_SITE_URL", default_value = "https://www.latimes.com/")]
    pub site_url: String,

    /// Show the browser window instead of running headless
    #[arg(long)]
    pub headful: bool,

    /// Also write the report rows as JSON next to the spreadsheet
    #[arg(long)]
    pub json: bool,
}
