//! JSON snapshot of the report.
//!
//! Written next to the spreadsheet with the same stem, as an array of
//! objects keyed by the report headers:
//!
//! ```text
//! [{"Title": "...", "Date": "Oct. 5, 2024", "Description": "...",
//!   "ProfilePicture": "output/article_1.jpeg", "Phrase": 1, "Amount": "No"}]
//! ```

use crate::error::Result;
use crate::models::ArticleRecord;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

#[instrument(level = "info", skip(records), fields(path = %path.display(), rows = records.len()))]
pub async fn write_snapshot(records: &[ArticleRecord], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json).await?;
    info!("Wrote JSON snapshot");
    Ok(())
}
