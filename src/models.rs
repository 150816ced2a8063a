//! Data models for search result cards and collected articles.
//!
//! - [`ResultCard`]: raw text pulled from one entry of the results list
//! - [`ArticleRecord`]: a qualifying article, annotated and ready for the report
//! - [`DateRange`]: the month-aligned crawl window
//!
//! Report columns are `Title, Date, Description, ProfilePicture, Phrase, Amount`;
//! the serde names below follow them so the JSON snapshot and the spreadsheet
//! agree.

use crate::annotate::{annotate, Annotation};
use chrono::NaiveDate;
use serde::{Serialize, Serializer};

/// Header row of the exported report, in column order.
pub const REPORT_HEADERS: [&str; 6] = [
    "Title",
    "Date",
    "Description",
    "ProfilePicture",
    "Phrase",
    "Amount",
];

/// Inclusive calendar window `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Text read from a single search result entry.
///
/// Every field is optional: the site omits descriptions and thumbnails on
/// some entries, and a missing timestamp means the entry is skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultCard {
    pub title: Option<String>,
    pub date_text: Option<String>,
    pub description: Option<String>,
    /// Absolute URL of the thumbnail image.
    pub image_url: Option<String>,
}

/// One article that passed the date policy.
///
/// `phrase_count` and `has_amount` are derived from the title and
/// description when the record is built and cannot be set afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ArticleRecord {
    pub title: String,
    /// The date exactly as displayed on the site.
    pub date: String,
    /// Parsed form of `date`, used only for filtering.
    #[serde(skip)]
    pub published_on: NaiveDate,
    pub description: String,
    /// Where the thumbnail was saved; empty when the download failed.
    pub profile_picture: String,
    #[serde(rename = "Phrase")]
    phrase_count: usize,
    #[serde(rename = "Amount", serialize_with = "yes_no")]
    has_amount: bool,
}

impl ArticleRecord {
    pub fn new(
        title: String,
        date: String,
        published_on: NaiveDate,
        description: String,
        profile_picture: String,
        search_phrase: &str,
    ) -> Self {
        let Annotation {
            phrase_count,
            has_amount,
        } = annotate(&title, &description, search_phrase);
        Self {
            title,
            date,
            published_on,
            description,
            profile_picture,
            phrase_count,
            has_amount,
        }
    }

    pub fn phrase_count(&self) -> usize {
        self.phrase_count
    }

    pub fn has_amount(&self) -> bool {
        self.has_amount
    }

    /// The `Amount` column value.
    pub fn amount_label(&self) -> &'static str {
        if self.has_amount { "Yes" } else { "No" }
    }
}

fn yes_no<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *value { "Yes" } else { "No" })
}
