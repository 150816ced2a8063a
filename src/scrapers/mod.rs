//! Site access for the crawl: the browser driver and the image fetcher.
//!
//! The session never talks to chromiumoxide or reqwest directly. It goes
//! through two capability traits so the pagination and page logic can run
//! against in-memory fakes:
//!
//! - [`NewsDriver`]: search, sort, filter, read the results list, paginate
//! - [`ImageFetcher`]: save a thumbnail to disk
//!
//! # Submodules
//!
//! | Module | Role |
//! |--------|------|
//! | [`latimes`] | chromiumoxide driver for latimes.com search |
//! | [`cards`] | parse the results list HTML into [`ResultCard`]s |
//! | [`images`] | reqwest-backed thumbnail downloads |

use crate::error::Result;
use crate::models::ResultCard;
use std::path::Path;

pub mod cards;
pub mod images;
pub mod latimes;

/// Browser operations the crawl needs, one call per user-visible step.
///
/// Each method blocks until the page reflects the action or the configured
/// wait timeout elapses.
pub trait NewsDriver {
    /// Navigate to the site's front page.
    async fn open(&mut self, url: &str) -> Result<()>;

    /// Submit `phrase` through the site search and wait for results.
    async fn search(&mut self, phrase: &str) -> Result<()>;

    /// Switch the result ordering to newest first.
    async fn sort_newest(&mut self) -> Result<()>;

    /// Tick the topic filter matching `category`.
    async fn select_category(&mut self, category: &str) -> Result<()>;

    /// Read every entry of the currently displayed results page, in page order.
    async fn result_cards(&mut self) -> Result<Vec<ResultCard>>;

    /// Click through to the next results page.
    ///
    /// Returns `Ok(false)` when there is no next-page control.
    async fn next_page(&mut self) -> Result<bool>;

    /// Shut the browser down.
    async fn close(&mut self) -> Result<()>;
}

/// Downloads an image to a local file.
pub trait ImageFetcher {
    async fn download(&self, url: &str, dest: &Path) -> Result<()>;
}

impl<T: NewsDriver> NewsDriver for &mut T {
    async fn open(&mut self, url: &str) -> Result<()> {
        (**self).open(url).await
    }

    async fn search(&mut self, phrase: &str) -> Result<()> {
        (**self).search(phrase).await
    }

    async fn sort_newest(&mut self) -> Result<()> {
        (**self).sort_newest().await
    }

    async fn select_category(&mut self, category: &str) -> Result<()> {
        (**self).select_category(category).await
    }

    async fn result_cards(&mut self) -> Result<Vec<ResultCard>> {
        (**self).result_cards().await
    }

    async fn next_page(&mut self) -> Result<bool> {
        (**self).next_page().await
    }

    async fn close(&mut self) -> Result<()> {
        (**self).close().await
    }
}

impl<T: ImageFetcher> ImageFetcher for &T {
    async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        (**self).download(url, dest).await
    }
}

#[cfg(test)]
pub(crate) mod fake;
