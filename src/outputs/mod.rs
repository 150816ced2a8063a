//! Report writers.
//!
//! # Submodules
//!
//! - [`xlsx`]: the spreadsheet report, always written
//! - [`json`]: a JSON copy of the same rows, written on request
//!
//! # Output Structure
//!
//! ```text
//! output/
//! ├── article_1.jpeg
//! ├── article_2.jpeg
//! ├── los-angeles-times.xlsx
//! └── los-angeles-times.json   # with --json
//! ```

pub mod json;
pub mod xlsx;

use crate::error::Result;
use crate::models::ArticleRecord;
use crate::pagination::ReportSink;
use std::path::PathBuf;
use tokio::fs;

/// [`ReportSink`] writing the spreadsheet, and optionally the JSON snapshot,
/// into the output directory.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub output_dir: PathBuf,
    /// Spreadsheet file name, e.g. `los-angeles-times.xlsx`.
    pub report_name: String,
    pub write_json: bool,
}

impl FileReport {
    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.report_name)
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.report_path().with_extension("json")
    }
}

impl ReportSink for FileReport {
    async fn export(&mut self, records: &[ArticleRecord]) -> Result<()> {
        fs::create_dir_all(&self.output_dir).await?;
        xlsx::write_report(records, &self.report_path())?;
        if self.write_json {
            json::write_snapshot(records, &self.snapshot_path()).await?;
        }
        Ok(())
    }
}
