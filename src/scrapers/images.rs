//! Thumbnail downloads over HTTP.

use crate::error::{CrawlError, Result};
use crate::scrapers::ImageFetcher;
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tracing::{debug, instrument};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// [`ImageFetcher`] backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl ImageFetcher for HttpImageFetcher {
    #[instrument(level = "debug", skip(self), fields(dest = %dest.display()))]
    async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::Download(format!("{} returned {}", url, status)));
        }

        let bytes = response.bytes().await?;
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(dest, &bytes).await?;

        debug!(bytes = bytes.len(), "Saved image");
        Ok(())
    }
}
