//! Walking the result pages and deciding when to stop.
//!
//! The crawl is a small state machine:
//!
//! ```text
//! FetchingPage(1) ──process──▶ Advancing(1) ──next──▶ FetchingPage(2) ─ ...
//!        │                          │
//!        └──────────┬───────────────┘
//!                   ▼
//!              Done(reason) ──▶ one export of every collected record
//! ```
//!
//! A processed page moves to `Done` when it yielded no qualifying articles
//! (results are newest first, so the date window has been passed) or when it
//! was the last allowed page. `Advancing` moves to `Done` when there is no
//! next-page control or clicking it fails. A results page that cannot be read
//! also ends the crawl. The report is exported only on `Done`, exactly once.

use crate::error::Result;
use crate::models::ArticleRecord;
use crate::page::PageProcessor;
use crate::scrapers::{ImageFetcher, NewsDriver};
use tracing::{info, instrument, warn};

pub const DEFAULT_MAX_PAGES: u32 = 3;

/// Number of the first downloaded thumbnail (`article_1.jpeg`).
pub const FIRST_IMAGE_INDEX: usize = 1;

/// Where collected records go once the crawl is done.
pub trait ReportSink {
    async fn export(&mut self, records: &[ArticleRecord]) -> Result<()>;
}

impl<T: ReportSink> ReportSink for &mut T {
    async fn export(&mut self, records: &[ArticleRecord]) -> Result<()> {
        (**self).export(records).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    FetchingPage(u32),
    Advancing(u32),
    Done(StopReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A page produced no qualifying articles.
    DateWindowExhausted,
    /// `max_pages` pages were processed.
    PageLimit,
    /// The next-page control was missing or could not be clicked.
    NoNextPage,
    /// The results list could not be read.
    PageUnreadable,
}

/// What a finished crawl produced.
#[derive(Debug)]
pub struct CrawlOutcome {
    pub records: Vec<ArticleRecord>,
    pub pages_processed: u32,
    pub stop_reason: StopReason,
}

#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    max_pages: u32,
}

impl Paginator {
    /// Create a paginator.
    ///
    /// # Arguments
    ///
    /// * `max_pages` - Upper bound on result pages processed; `0` is treated as `1`
    pub fn new(max_pages: u32) -> Self {
        Self {
            max_pages: max_pages.max(1),
        }
    }

    /// Decide whether the crawl ends after processing `page`.
    ///
    /// # Arguments
    ///
    /// * `page` - 1-based number of the page just processed
    /// * `qualifying` - How many records that page produced
    ///
    /// # Returns
    ///
    /// `Some(reason)` when the crawl should stop, `None` to advance. An empty
    /// page wins over the page limit.
    pub fn stop_after(&self, page: u32, qualifying: usize) -> Option<StopReason> {
        if qualifying == 0 {
            Some(StopReason::DateWindowExhausted)
        } else if page >= self.max_pages {
            Some(StopReason::PageLimit)
        } else {
            None
        }
    }

    /// Drive pages until `Done`, then hand every record to `sink` once.
    ///
    /// Thumbnails are numbered from [`FIRST_IMAGE_INDEX`] and the numbering
    /// continues across pages.
    ///
    /// # Arguments
    ///
    /// * `driver` - Browser positioned on the first results page
    /// * `processor` - Filters and annotates the cards of each page
    /// * `sink` - Receives the accumulated records exactly once
    ///
    /// # Returns
    ///
    /// The collected records, how many pages were processed and why the
    /// crawl stopped.
    ///
    /// # Errors
    ///
    /// Only a failed export is returned; page-level failures end the crawl
    /// early but still export what was collected.
    #[instrument(level = "info", skip_all, fields(max_pages = self.max_pages))]
    pub async fn run<D, F, S>(
        &self,
        driver: &mut D,
        processor: &PageProcessor<'_, F>,
        sink: &mut S,
    ) -> Result<CrawlOutcome>
    where
        D: NewsDriver,
        F: ImageFetcher,
        S: ReportSink,
    {
        let mut records: Vec<ArticleRecord> = Vec::new();
        let mut next_index = FIRST_IMAGE_INDEX;
        let mut pages_processed = 0;
        let mut state = CrawlState::FetchingPage(1);

        let stop_reason = loop {
            state = match state {
                CrawlState::FetchingPage(page) => match driver.result_cards().await {
                    Ok(cards) => {
                        let page_records =
                            processor.extract_page_articles(&cards, next_index).await;
                        let qualifying = page_records.len();
                        next_index += qualifying;
                        records.extend(page_records);
                        pages_processed = page;

                        info!(page, qualifying, total = records.len(), "Page done");
                        match self.stop_after(page, qualifying) {
                            Some(reason) => CrawlState::Done(reason),
                            None => CrawlState::Advancing(page),
                        }
                    }
                    Err(e) => {
                        warn!(page, error = %e, "Could not read results page");
                        CrawlState::Done(StopReason::PageUnreadable)
                    }
                },
                CrawlState::Advancing(page) => match driver.next_page().await {
                    Ok(true) => CrawlState::FetchingPage(page + 1),
                    Ok(false) => CrawlState::Done(StopReason::NoNextPage),
                    Err(e) => {
                        warn!(page, error = %e, "Next-page control failed; stopping");
                        CrawlState::Done(StopReason::NoNextPage)
                    }
                },
                CrawlState::Done(reason) => break reason,
            };
        };

        info!(
            ?stop_reason,
            pages_processed,
            records = records.len(),
            "Crawl finished; exporting report"
        );
        sink.export(&records).await?;

        Ok(CrawlOutcome {
            records,
            pages_processed,
            stop_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::DatePolicy;
    use crate::models::{DateRange, ResultCard};
    use crate::scrapers::fake::{card, CountingSink, FakeDriver, RecordingFetcher};
    use chrono::NaiveDate;
    use std::path::Path;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn processor(fetcher: &RecordingFetcher) -> PageProcessor<'_, RecordingFetcher> {
        PageProcessor {
            search_phrase: "Imran Khan",
            policy: DatePolicy::Range(DateRange {
                start: ymd(2024, 10, 1),
                end: ymd(2024, 10, 31),
            }),
            today: ymd(2024, 10, 19),
            image_dir: Path::new("output"),
            fetcher,
        }
    }

    /// `n` in-window cards, each with a thumbnail.
    fn fresh_page(n: usize) -> Vec<ResultCard> {
        (0..n)
            .map(|i| card(&format!("story {}", i), "Oct. 10, 2024", Some("https://img/x.jpg")))
            .collect()
    }

    fn stale_page(n: usize) -> Vec<ResultCard> {
        (0..n)
            .map(|i| card(&format!("old {}", i), "Aug. 1, 2024", None))
            .collect()
    }

    #[test]
    fn test_stop_after() {
        let p = Paginator::new(3);
        assert_eq!(p.stop_after(1, 0), Some(StopReason::DateWindowExhausted));
        assert_eq!(p.stop_after(1, 4), None);
        assert_eq!(p.stop_after(2, 4), None);
        assert_eq!(p.stop_after(3, 4), Some(StopReason::PageLimit));
    }

    #[test]
    fn test_max_pages_at_least_one() {
        assert_eq!(Paginator::new(0).stop_after(1, 5), Some(StopReason::PageLimit));
    }

    #[tokio::test]
    async fn test_stops_on_page_without_qualifying_articles() {
        let fetcher = RecordingFetcher::default();
        let mut driver = FakeDriver::with_pages(vec![fresh_page(4), stale_page(5), fresh_page(4)]);
        let mut sink = CountingSink::default();

        let outcome = Paginator::new(3)
            .run(&mut driver, &processor(&fetcher), &mut sink)
            .await
            .unwrap();

        assert_eq!(outcome.stop_reason, StopReason::DateWindowExhausted);
        assert_eq!(outcome.pages_processed, 2);
        assert_eq!(outcome.records.len(), 4);
        assert_eq!(driver.count("next"), 1);
        assert_eq!(driver.count("cards"), 2);
        assert_eq!(sink.exports, 1);
        assert_eq!(sink.last.len(), 4);
    }

    #[tokio::test]
    async fn test_stops_at_max_pages_and_exports_once() {
        let fetcher = RecordingFetcher::default();
        let pages = (0..5).map(|_| fresh_page(2)).collect();
        let mut driver = FakeDriver::with_pages(pages);
        let mut sink = CountingSink::default();

        let outcome = Paginator::new(3)
            .run(&mut driver, &processor(&fetcher), &mut sink)
            .await
            .unwrap();

        assert_eq!(outcome.stop_reason, StopReason::PageLimit);
        assert_eq!(outcome.pages_processed, 3);
        assert_eq!(driver.count("cards"), 3);
        assert_eq!(driver.count("next"), 2);
        assert_eq!(sink.exports, 1);
        assert_eq!(sink.last.len(), 6);
    }

    #[tokio::test]
    async fn test_image_indices_continue_across_pages() {
        let fetcher = RecordingFetcher::default();
        let mut driver = FakeDriver::with_pages(vec![fresh_page(5), fresh_page(3)]);
        let mut sink = CountingSink::default();

        let outcome = Paginator::new(3)
            .run(&mut driver, &processor(&fetcher), &mut sink)
            .await
            .unwrap();

        let pictures: Vec<_> = outcome
            .records
            .iter()
            .map(|r| r.profile_picture.clone())
            .collect();
        let expected: Vec<_> = (1..=8).map(|n| format!("output/article_{}.jpeg", n)).collect();
        assert_eq!(pictures, expected);
        assert_eq!(outcome.records[5].profile_picture, "output/article_6.jpeg");
        assert_eq!(
            outcome.records[0].profile_picture,
            format!("output/{}", crate::page::image_file_name(FIRST_IMAGE_INDEX))
        );
    }

    #[tokio::test]
    async fn test_missing_next_control_ends_crawl() {
        let fetcher = RecordingFetcher::default();
        let mut driver = FakeDriver::with_pages(vec![fresh_page(2)]);
        let mut sink = CountingSink::default();

        let outcome = Paginator::new(3)
            .run(&mut driver, &processor(&fetcher), &mut sink)
            .await
            .unwrap();

        assert_eq!(outcome.stop_reason, StopReason::NoNextPage);
        assert_eq!(outcome.pages_processed, 1);
        assert_eq!(sink.exports, 1);
    }

    #[tokio::test]
    async fn test_failing_next_control_is_natural_end() {
        let fetcher = RecordingFetcher::default();
        let mut driver =
            FakeDriver::with_pages(vec![fresh_page(2), fresh_page(2)]).failing("next");
        let mut sink = CountingSink::default();

        let outcome = Paginator::new(3)
            .run(&mut driver, &processor(&fetcher), &mut sink)
            .await
            .unwrap();

        assert_eq!(outcome.stop_reason, StopReason::NoNextPage);
        assert_eq!(sink.exports, 1);
        assert_eq!(sink.last.len(), 2);
    }

    #[tokio::test]
    async fn test_unreadable_page_still_exports_once() {
        let fetcher = RecordingFetcher::default();
        let mut driver = FakeDriver::with_pages(vec![fresh_page(2)]).failing("cards");
        let mut sink = CountingSink::default();

        let outcome = Paginator::new(3)
            .run(&mut driver, &processor(&fetcher), &mut sink)
            .await
            .unwrap();

        assert_eq!(outcome.stop_reason, StopReason::PageUnreadable);
        assert_eq!(outcome.pages_processed, 0);
        assert!(outcome.records.is_empty());
        assert_eq!(sink.exports, 1);
    }
}
