//! Turning one page of result cards into article records.
//!
//! Entries are handled in page order. An entry is skipped when it has no
//! readable date, when the date does not parse, or when the date falls
//! outside the [`DatePolicy`]. Everything else about an entry is best
//! effort: a missing title or description becomes an empty string, and a
//! failed thumbnail download leaves `profile_picture` empty.

use crate::dates::{parse_display_date, DatePolicy};
use crate::models::{ArticleRecord, ResultCard};
use crate::scrapers::ImageFetcher;
use crate::utils::truncate_for_log;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// File name of the `index`-th downloaded thumbnail.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(image_file_name(3), "article_3.jpeg");
/// ```
pub fn image_file_name(index: usize) -> String {
    format!("article_{}.jpeg", index)
}

/// Per-crawl settings needed to evaluate a results page.
pub struct PageProcessor<'a, F> {
    pub search_phrase: &'a str,
    pub policy: DatePolicy,
    /// Date that relative timestamps ("3 hours ago") resolve to.
    pub today: NaiveDate,
    pub image_dir: &'a Path,
    pub fetcher: &'a F,
}

impl<'a, F: ImageFetcher> PageProcessor<'a, F> {
    /// Build records for the qualifying entries of one page.
    ///
    /// Entries without a readable date, with an unrecognized date, or outside
    /// the policy are skipped. A failed thumbnail download is logged and the
    /// record keeps an empty `profile_picture`.
    ///
    /// # Arguments
    ///
    /// * `cards` - Entries of the results page, in page order
    /// * `start_index` - Number given to the first saved thumbnail
    ///
    /// # Returns
    ///
    /// The qualifying records in page order. Thumbnails are numbered in the
    /// order records are emitted, so the next page should start at
    /// `start_index + records.len()`.
    #[instrument(level = "info", skip(self, cards), fields(cards = cards.len()))]
    pub async fn extract_page_articles(
        &self,
        cards: &[ResultCard],
        start_index: usize,
    ) -> Vec<ArticleRecord> {
        let mut records = Vec::new();

        for (position, card) in cards.iter().enumerate() {
            let Some(date_text) = card.date_text.as_deref().filter(|t| !t.trim().is_empty())
            else {
                debug!(position, "Entry has no date; skipping");
                continue;
            };

            let Some(published_on) = parse_display_date(date_text, self.today) else {
                continue;
            };

            if !self.policy.accepts(published_on) {
                debug!(position, %published_on, "Entry outside date policy");
                continue;
            }

            let index = start_index + records.len();
            let title = card.title.clone().unwrap_or_default();
            let description = card.description.clone().unwrap_or_default();
            let profile_picture = self.save_image(card.image_url.as_deref(), index).await;
            debug!(index, title = %truncate_for_log(&title, 80), %published_on, "Qualifying article");

            records.push(ArticleRecord::new(
                title,
                date_text.to_string(),
                published_on,
                description,
                profile_picture,
                self.search_phrase,
            ));
        }

        info!(qualifying = records.len(), "Processed results page");
        records
    }

    /// Download the thumbnail, returning the saved path or an empty string.
    async fn save_image(&self, url: Option<&str>, index: usize) -> String {
        let Some(url) = url else {
            debug!(index, "Entry has no image");
            return String::new();
        };

        let dest: PathBuf = self.image_dir.join(image_file_name(index));
        match self.fetcher.download(url, &dest).await {
            Ok(()) => dest.to_string_lossy().into_owned(),
            Err(e) => {
                warn!(index, %url, error = %e, "Image download failed");
                String::new()
            }
        }
    }
}
