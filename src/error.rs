//! Error type shared by every stage of a crawl.
//!
//! Recoverable failures (a missing element, an unparseable date, a failed
//! image download) are absorbed close to where they happen and turned into
//! degraded results. The variants here are what those call sites see, and
//! what reaches `main` when a failure is crawl-fatal.

use chromiumoxide::error::CdpError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrawlError {
    /// Invalid or missing configuration; raised before the browser starts.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Browser error: {0}")]
    Browser(Box<CdpError>),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Timed out after {secs}s waiting for {what}")]
    Timeout { what: String, secs: u64 },

    #[error("Download failed: {0}")]
    Download(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Report error: {0}")]
    Report(#[from] rust_xlsxwriter::XlsxError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<CdpError> for CrawlError {
    fn from(err: CdpError) -> Self {
        CrawlError::Browser(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, CrawlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message() {
        let err = CrawlError::Timeout {
            what: "search input".to_string(),
            secs: 30,
        };
        assert_eq!(err.to_string(), "Timed out after 30s waiting for search input");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: CrawlError = io.into();
        assert!(matches!(err, CrawlError::Io(_)));
    }
}
