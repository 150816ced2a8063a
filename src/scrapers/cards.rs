//! Result list parsing.
//!
//! The driver hands over the rendered page HTML; this module pulls each
//! `li` of the search results menu apart into a [`ResultCard`]. Image
//! sources are resolved against the page URL since the site mixes
//! protocol-relative and absolute thumbnails.

use crate::models::ResultCard;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

pub const RESULTS_SELECTOR: &str = "ul.search-results-module-results-menu > li";
const TITLE_SELECTOR: &str = "h3 a.link";
const DATE_SELECTOR: &str = "p.promo-timestamp";
const DESCRIPTION_SELECTOR: &str = "p.promo-description";
const IMAGE_SELECTOR: &str = "img";

static RESULTS: Lazy<Selector> = Lazy::new(|| Selector::parse(RESULTS_SELECTOR).unwrap());
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse(TITLE_SELECTOR).unwrap());
static DATE: Lazy<Selector> = Lazy::new(|| Selector::parse(DATE_SELECTOR).unwrap());
static DESCRIPTION: Lazy<Selector> = Lazy::new(|| Selector::parse(DESCRIPTION_SELECTOR).unwrap());
static IMAGE: Lazy<Selector> = Lazy::new(|| Selector::parse(IMAGE_SELECTOR).unwrap());

/// Parse all result entries out of a results page, in document order.
pub fn parse_result_cards(html: &str, page_url: &str) -> Vec<ResultCard> {
    let document = Html::parse_document(html);
    let base = Url::parse(page_url).ok();

    let cards: Vec<ResultCard> = document
        .select(&RESULTS)
        .map(|item| ResultCard {
            title: first_text(&item, &TITLE),
            date_text: first_text(&item, &DATE),
            description: first_text(&item, &DESCRIPTION),
            image_url: image_url(&item, base.as_ref()),
        })
        .collect();

    debug!(count = cards.len(), "Parsed result cards");
    cards
}

/// Trimmed text of the first match, `None` when missing or blank.
fn first_text(item: &ElementRef, selector: &Selector) -> Option<String> {
    item.select(selector)
        .next()
        .map(|el| el.text().collect::<Vec<_>>().join(" "))
        .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|text| !text.is_empty())
}

fn image_url(item: &ElementRef, base: Option<&Url>) -> Option<String> {
    let src = item
        .select(&IMAGE)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(str::trim)
        .filter(|src| !src.is_empty())?;

    match base {
        Some(base) => base.join(src).ok().map(|u| u.to_string()),
        None => Url::parse(src).ok().map(|u| u.to_string()),
    }
}
