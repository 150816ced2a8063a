//! Date helpers for the crawl window and for the timestamps printed on
//! search result cards.
//!
//! The site prints dates in a handful of shapes:
//! - relative: `"2 hours ago"`, `"35 mins ago"`
//! - long month: `"March 4, 2024"`
//! - abbreviated month, with or without a period: `"Oct. 5, 2024"`, `"Sept. 12, 2024"`
//! - day first: `"5 Oct 2024"`, `"12-Oct-2024"`
//! - any of the above after an `"Updated"` or `"Published"` label
//!
//! Everything is parsed into a [`NaiveDate`]; unknown shapes yield `None` so
//! the caller can skip the article.

use crate::error::{CrawlError, Result};
use crate::models::DateRange;
use chrono::{Datelike, Months, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

/// Formats tried in order after normalization. `%B` accepts both full and
/// three-letter month names when parsing.
const DISPLAY_FORMATS: &[&str] = &[
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
    "%d-%b-%Y",
];

/// Month abbreviations the site uses that chrono does not know.
const MONTH_ALIASES: &[(&str, &str)] = &[("Sept", "Sep")];

static MONTH_PERIOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sept|Sep|Oct|Nov|Dec)\.").unwrap()
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static LABEL_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:updated|published)\s*:?\s*").unwrap());

/// Compute the inclusive month-aligned crawl window ending this month.
///
/// `start` is the first day of the month `months - 1` months before `today`'s
/// month; `end` is the last day of `today`'s month. With `months == 1` the
/// window is the current calendar month.
///
/// # Errors
///
/// Returns [`CrawlError::Config`] when `months` is zero.
pub fn compute_date_range(months: u32, today: NaiveDate) -> Result<DateRange> {
    if months < 1 {
        return Err(CrawlError::Config(
            "months must be at least 1".to_string(),
        ));
    }

    let first_of_month = first_day_of_month(today);
    let start = first_of_month
        .checked_sub_months(Months::new(months - 1))
        .ok_or_else(|| CrawlError::Config(format!("months={} reaches before year 0", months)))?;
    let end = last_day_of_month(today);

    debug!(%start, %end, months, "Computed crawl date range");
    Ok(DateRange { start, end })
}

fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    first_day_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// Rewrite a displayed date into a form the [`DISPLAY_FORMATS`] accept.
///
/// Collapses whitespace, strips an `Updated`/`Published` label, drops the
/// period after an abbreviated month, and maps non-standard abbreviations
/// (`Sept`) to chrono's three-letter form. Already-normalized input is
/// returned unchanged.
pub fn normalize_display_date(text: &str) -> String {
    let collapsed = WHITESPACE.replace_all(text.trim(), " ");
    let collapsed = LABEL_PREFIX.replace(&collapsed, "");
    let without_period = MONTH_PERIOD.replace_all(&collapsed, "$1");

    without_period
        .split(' ')
        .map(|word| {
            let bare = word.trim_end_matches(',');
            MONTH_ALIASES
                .iter()
                .find(|(alias, _)| bare.eq_ignore_ascii_case(alias))
                .map(|(_, canonical)| word.replacen(bare, canonical, 1))
                .unwrap_or_else(|| word.to_string())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a result card's displayed date.
///
/// Relative timestamps mentioning hours or minutes resolve to `today`.
/// Returns `None` and logs when nothing matches; it never fails.
pub fn parse_display_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let lowered = text.to_lowercase();
    if lowered.contains("hour") || lowered.contains("min") {
        return Some(today);
    }

    let normalized = normalize_display_date(text);
    let parsed = DISPLAY_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&normalized, fmt).ok());

    if parsed.is_none() {
        warn!(raw = %text, normalized = %normalized, "Unrecognized date format; skipping");
    }
    parsed
}

/// Which publish dates qualify an article for collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePolicy {
    /// Inclusive `[start, end]` window.
    Range(DateRange),
    /// Everything published on or after the cutoff.
    OnOrAfter(NaiveDate),
}

impl DatePolicy {
    pub fn accepts(&self, date: NaiveDate) -> bool {
        match self {
            DatePolicy::Range(range) => range.start <= date && date <= range.end,
            DatePolicy::OnOrAfter(cutoff) => date >= *cutoff,
        }
    }
}
