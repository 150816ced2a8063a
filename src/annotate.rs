//! Phrase counting and money detection for article text.
//!
//! The search phrase is matched as a literal, case-insensitively, so a phrase
//! like `"C++ (2024)"` counts occurrences of exactly that text.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use tracing::warn;

/// Dollar amounts: `$11.1`, `$111,111.11`, `11 dollars`, `11 USD`.
static AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\d[\d,]*(?:\.\d+)?|\b\d+\s*(?i:dollars|usd)\b").unwrap()
});

/// Result of scanning an article's title and description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Annotation {
    pub phrase_count: usize,
    pub has_amount: bool,
}

/// Join title and description the way the report counts them.
fn article_text(title: &str, description: &str) -> String {
    if description.is_empty() {
        title.to_string()
    } else {
        format!("{} {}", title, description)
    }
}

/// Count non-overlapping, case-insensitive occurrences of `phrase`.
///
/// An empty phrase counts as zero rather than matching between every character.
pub fn count_phrase(text: &str, phrase: &str) -> usize {
    if phrase.is_empty() {
        return 0;
    }
    match RegexBuilder::new(&regex::escape(phrase))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re.find_iter(text).count(),
        Err(e) => {
            warn!(phrase, error = %e, "Could not compile phrase matcher");
            0
        }
    }
}

pub fn contains_amount(text: &str) -> bool {
    AMOUNT.is_match(text)
}

/// Scan an article's title and description for the search phrase and money.
pub fn annotate(title: &str, description: &str, search_phrase: &str) -> Annotation {
    let text = article_text(title, description);
    Annotation {
        phrase_count: count_phrase(&text, search_phrase),
        has_amount: contains_amount(&text),
    }
}
