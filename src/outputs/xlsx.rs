//! Spreadsheet report.
//!
//! One sheet named `Articles`: a bold header row followed by one row per
//! record in crawl order. `Phrase` is written as a number so it can be
//! sorted and summed; `Amount` is `Yes` or `No`.

use crate::error::Result;
use crate::models::{ArticleRecord, REPORT_HEADERS};
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;
use tracing::{info, instrument};

const SHEET_NAME: &str = "Articles";

/// Column widths, in characters, matching [`REPORT_HEADERS`].
const COLUMN_WIDTHS: [f64; 6] = [60.0, 16.0, 80.0, 32.0, 8.0, 8.0];

/// Write `records` to a new workbook at `path`, replacing any existing file.
#[instrument(level = "info", skip(records), fields(path = %path.display(), rows = records.len()))]
pub fn write_report(records: &[ArticleRecord], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    let bold = Format::new().set_bold();
    for (col, (header, width)) in REPORT_HEADERS.iter().zip(COLUMN_WIDTHS).enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, *header, &bold)?;
        sheet.set_column_width(col, width)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, record.title.as_str())?;
        sheet.write_string(row, 1, record.date.as_str())?;
        sheet.write_string(row, 2, record.description.as_str())?;
        sheet.write_string(row, 3, record.profile_picture.as_str())?;
        sheet.write_number(row, 4, record.phrase_count() as f64)?;
        sheet.write_string(row, 5, record.amount_label())?;
    }

    workbook.save(path)?;
    info!("Wrote spreadsheet report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook, Data, Reader, Xlsx};
    use chrono::NaiveDate;

    fn record(title: &str) -> ArticleRecord {
        ArticleRecord::new(
            title.to_string(),
            "Oct. 5, 2024".to_string(),
            NaiveDate::from_ymd_opt(2024, 10, 5).unwrap(),
            "Paid $1,000".to_string(),
            String::new(),
            "Khan",
        )
    }

    #[test]
    fn test_writes_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("los-angeles-times.xlsx");

        write_report(&[record("Khan one"), record("Khan two")], &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        // xlsx files are zip archives
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_rows_follow_header_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("los-angeles-times.xlsx");
        let first = ArticleRecord::new(
            "Khan and Khan".to_string(),
            "Oct. 5, 2024".to_string(),
            NaiveDate::from_ymd_opt(2024, 10, 5).unwrap(),
            "Paid $1,000".to_string(),
            "output/article_1.jpeg".to_string(),
            "Khan",
        );
        let second = ArticleRecord::new(
            "Awards night".to_string(),
            "3 hours ago".to_string(),
            NaiveDate::from_ymd_opt(2024, 10, 19).unwrap(),
            String::new(),
            String::new(),
            "Khan",
        );

        write_report(&[first, second], &path).unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        let cell = |row: u32, col: u32| range.get_value((row, col)).cloned();
        let text = |s: &str| Some(Data::String(s.to_string()));

        assert_eq!(range.height(), 3);
        for (col, header) in REPORT_HEADERS.iter().enumerate() {
            assert_eq!(cell(0, col as u32), text(header));
        }

        assert_eq!(cell(1, 0), text("Khan and Khan"));
        assert_eq!(cell(1, 1), text("Oct. 5, 2024"));
        assert_eq!(cell(1, 2), text("Paid $1,000"));
        assert_eq!(cell(1, 3), text("output/article_1.jpeg"));
        assert_eq!(cell(1, 4), Some(Data::Float(2.0)));
        assert_eq!(cell(1, 5), text("Yes"));

        assert_eq!(cell(2, 0), text("Awards night"));
        assert_eq!(cell(2, 1), text("3 hours ago"));
        assert_eq!(cell(2, 4), Some(Data::Float(0.0)));
        assert_eq!(cell(2, 5), text("No"));
    }

    #[test]
    fn test_empty_report_still_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");

        write_report(&[], &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_overwrites_previous_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        std::fs::write(&path, b"stale").unwrap();

        write_report(&[record("Khan")], &path).unwrap();
        assert!(std::fs::read(&path).unwrap().starts_with(b"PK"));
    }

    #[test]
    fn test_missing_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("report.xlsx");
        assert!(write_report(&[], &path).is_err());
    }
}
