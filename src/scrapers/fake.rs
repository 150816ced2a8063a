//! In-memory stand-ins for the browser, the image fetcher and the report
//! sink, used by the page, pagination and session tests.

use crate::error::{CrawlError, Result};
use crate::models::{ArticleRecord, ResultCard};
use crate::pagination::ReportSink;
use crate::scrapers::{ImageFetcher, NewsDriver};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub fn card(title: &str, date: &str, image: Option<&str>) -> ResultCard {
    ResultCard {
        title: Some(title.to_string()),
        date_text: Some(date.to_string()),
        description: None,
        image_url: image.map(str::to_string),
    }
}

/// Serves a fixed list of result pages and logs every call it receives.
#[derive(Debug, Default)]
pub struct FakeDriver {
    pub pages: Vec<Vec<ResultCard>>,
    pub current: usize,
    pub calls: Vec<String>,
    /// Step names (`"search"`, `"sort"`, ...) that should fail.
    pub failing: Vec<&'static str>,
}

impl FakeDriver {
    pub fn with_pages(pages: Vec<Vec<ResultCard>>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    pub fn failing(mut self, step: &'static str) -> Self {
        self.failing.push(step);
        self
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.iter().filter(|c| c.starts_with(call)).count()
    }

    fn step(&mut self, name: &'static str, detail: &str) -> Result<()> {
        self.calls.push(format!("{}{}", name, detail));
        if self.failing.contains(&name) {
            Err(CrawlError::ElementNotFound(name.to_string()))
        } else {
            Ok(())
        }
    }
}

impl NewsDriver for FakeDriver {
    async fn open(&mut self, url: &str) -> Result<()> {
        self.step("open", &format!(" {}", url))
    }

    async fn search(&mut self, phrase: &str) -> Result<()> {
        self.step("search", &format!(" {}", phrase))
    }

    async fn sort_newest(&mut self) -> Result<()> {
        self.step("sort", "")
    }

    async fn select_category(&mut self, category: &str) -> Result<()> {
        self.step("category", &format!(" {}", category))
    }

    async fn result_cards(&mut self) -> Result<Vec<ResultCard>> {
        self.step("cards", &format!(" {}", self.current + 1))?;
        Ok(self.pages.get(self.current).cloned().unwrap_or_default())
    }

    async fn next_page(&mut self) -> Result<bool> {
        self.step("next", "")?;
        if self.current + 1 < self.pages.len() {
            self.current += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.step("close", "")
    }
}

/// Records every download request; fails for URLs containing "broken".
#[derive(Debug, Default)]
pub struct RecordingFetcher {
    pub requests: Mutex<Vec<(String, PathBuf)>>,
}

impl ImageFetcher for RecordingFetcher {
    async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), dest.to_path_buf()));
        if url.contains("broken") {
            Err(CrawlError::Download(format!("{} returned 404", url)))
        } else {
            Ok(())
        }
    }
}

/// Counts exports and keeps the last exported batch.
#[derive(Debug, Default)]
pub struct CountingSink {
    pub exports: usize,
    pub last: Vec<ArticleRecord>,
}

impl ReportSink for CountingSink {
    async fn export(&mut self, records: &[ArticleRecord]) -> Result<()> {
        self.exports += 1;
        self.last = records.to_vec();
        Ok(())
    }
}
