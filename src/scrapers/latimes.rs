//! Los Angeles Times search, driven through headless Chrome.
//!
//! The search results page is rendered client-side, so plain HTTP fetching
//! is not enough: we launch Chrome with chromiumoxide, click through the
//! search form, sort and filter controls, then hand the rendered HTML to
//! [`cards::parse_result_cards`].
//!
//! # Flow
//!
//! 1. open `https://www.latimes.com/`
//! 2. click the search button, type the phrase, submit
//! 3. set the sort `<select>` to newest
//! 4. expand the topic list and tick the requested category
//! 5. read results, click "next page", repeat

use crate::error::{CrawlError, Result};
use crate::models::ResultCard;
use crate::scrapers::cards::{self, RESULTS_SELECTOR};
use crate::scrapers::NewsDriver;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

const SEARCH_BUTTON: &str = "button[data-element='search-button']";
const SEARCH_INPUT: &str = "input[data-element='search-form-input']";
const SEARCH_SUBMIT: &str = "button[data-element='search-submit-button']";
const RESULTS_HEADING: &str = "//h1[normalize-space(text())='Search results for']";
const NO_RESULTS: &str = "//div[contains(text(),'There are not any results that match')]";
const SORT_SELECT: &str = "select.select-input";
const SEE_ALL_TOPICS: &str = "(//button[contains(@class,'see-all-button')])[1]";
const NEXT_PAGE: &str = "div.search-results-module-next-page a";

/// Value of the "Newest" option in the sort dropdown.
const SORT_NEWEST_VALUE: &str = "1";

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// How to find an element on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Locator {
    Css(String),
    XPath(String),
}

impl Locator {
    fn css(selector: &str) -> Self {
        Locator::Css(selector.to_string())
    }

    fn xpath(selector: &str) -> Self {
        Locator::XPath(selector.to_string())
    }
}

/// Quote `value` as an XPath string literal, even when it contains quotes.
fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        format!("'{}'", value)
    } else if !value.contains('"') {
        format!("\"{}\"", value)
    } else {
        let parts: Vec<String> = value.split('\'').map(|p| format!("'{}'", p)).collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}

/// Checkbox in the topic filter whose label reads `category`.
fn category_checkbox(category: &str) -> Locator {
    Locator::XPath(format!(
        "//label[.//span[normalize-space(text())={}]]//input[@type='checkbox']",
        xpath_literal(category.trim())
    ))
}

/// Launch options for the Chrome instance.
#[derive(Debug, Clone)]
pub struct BrowserSettings {
    pub headless: bool,
    /// Upper bound for every element wait.
    pub wait_timeout: Duration,
}

/// [`NewsDriver`] over a single Chrome tab.
pub struct LaTimesDriver {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    wait_timeout: Duration,
    closed: bool,
}

impl LaTimesDriver {
    /// Start Chrome and open a blank tab.
    ///
    /// A failure here is crawl-fatal: there is nothing to drive.
    #[instrument(level = "info", skip_all, fields(headless = settings.headless))]
    pub async fn launch(settings: &BrowserSettings) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .window_size(1366, 900)
            .request_timeout(settings.wait_timeout)
            .args(["--no-sandbox", "--disable-dev-shm-usage", "--no-first-run"]);
        if !settings.headless {
            builder = builder.with_head();
        }
        let config = builder
            .build()
            .map_err(|e| CrawlError::Config(format!("Failed to build browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(config).await?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "CDP handler error (continuing)");
                }
            }
            debug!("CDP handler finished");
        });

        let page = browser.new_page("about:blank").await?;
        info!("Browser launched");

        Ok(Self {
            browser,
            page,
            handler,
            wait_timeout: settings.wait_timeout,
            closed: false,
        })
    }

    async fn find(&self, locator: &Locator) -> Result<Element> {
        let found = match locator {
            Locator::Css(selector) => self.page.find_element(selector.as_str()).await,
            Locator::XPath(selector) => self.page.find_xpath(selector.as_str()).await,
        };
        Ok(found?)
    }

    /// Poll until `locator` matches, or time out.
    async fn wait_present(&self, what: &str, locator: &Locator) -> Result<Element> {
        let deadline = Instant::now() + self.wait_timeout;
        loop {
            match self.find(locator).await {
                Ok(element) => return Ok(element),
                Err(e) if Instant::now() >= deadline => {
                    debug!(what, ?locator, error = %e, "Gave up waiting for element");
                    return Err(self.timeout(what));
                }
                Err(_) => sleep(POLL_INTERVAL).await,
            }
        }
    }

    /// Poll until `locator` matches an element that has a clickable point.
    async fn wait_visible(&self, what: &str, locator: &Locator) -> Result<Element> {
        let deadline = Instant::now() + self.wait_timeout;
        loop {
            if let Ok(element) = self.find(locator).await {
                if element.clickable_point().await.is_ok() {
                    return Ok(element);
                }
            }
            if Instant::now() >= deadline {
                return Err(self.timeout(what));
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    fn timeout(&self, what: &str) -> CrawlError {
        CrawlError::Timeout {
            what: what.to_string(),
            secs: self.wait_timeout.as_secs(),
        }
    }
}

impl NewsDriver for LaTimesDriver {
    #[instrument(level = "info", skip(self))]
    async fn open(&mut self, url: &str) -> Result<()> {
        self.page.goto(url).await?;
        info!("Opened site");
        Ok(())
    }

    #[instrument(level = "info", skip(self))]
    async fn search(&mut self, phrase: &str) -> Result<()> {
        self.wait_present("search button", &Locator::css(SEARCH_BUTTON))
            .await?
            .click()
            .await?;

        let input = self
            .wait_visible("search input", &Locator::css(SEARCH_INPUT))
            .await?;
        input.click().await?;
        input.type_str(phrase).await?;

        self.wait_present("search submit", &Locator::css(SEARCH_SUBMIT))
            .await?
            .click()
            .await?;

        self.wait_present("results heading", &Locator::xpath(RESULTS_HEADING))
            .await?;

        if self.find(&Locator::xpath(NO_RESULTS)).await.is_ok() {
            warn!("Site reports no results for phrase");
        }
        info!("Search submitted");
        Ok(())
    }

    #[instrument(level = "info", skip(self))]
    async fn sort_newest(&mut self) -> Result<()> {
        let select = self
            .wait_visible("sort dropdown", &Locator::css(SORT_SELECT))
            .await?;
        select
            .call_js_fn(
                format!(
                    "function() {{ this.value = '{}'; this.dispatchEvent(new Event('change', {{ bubbles: true }})); }}",
                    SORT_NEWEST_VALUE
                ),
                false,
            )
            .await?;
        self.page.wait_for_navigation().await?;
        info!("Sorted by newest");
        Ok(())
    }

    #[instrument(level = "info", skip(self))]
    async fn select_category(&mut self, category: &str) -> Result<()> {
        match self.find(&Locator::xpath(SEE_ALL_TOPICS)).await {
            Ok(see_all) => {
                see_all.click().await?;
            }
            Err(_) => debug!("No 'See All' topics button; using visible topics"),
        }

        let checkbox = self
            .wait_visible("category checkbox", &category_checkbox(category))
            .await
            .map_err(|_| CrawlError::ElementNotFound(format!("category '{}'", category)))?;
        checkbox.click().await?;
        self.page.wait_for_navigation().await?;
        info!("Category selected");
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    async fn result_cards(&mut self) -> Result<Vec<ResultCard>> {
        self.wait_present("results list", &Locator::css(RESULTS_SELECTOR))
            .await?;
        let html = self.page.content().await?;
        let url = self.page.url().await?.unwrap_or_default();
        Ok(cards::parse_result_cards(&html, &url))
    }

    #[instrument(level = "debug", skip(self))]
    async fn next_page(&mut self) -> Result<bool> {
        let next = match self.find(&Locator::css(NEXT_PAGE)).await {
            Ok(next) => next,
            Err(_) => {
                debug!("No next-page control");
                return Ok(false);
            }
        };
        next.click().await?;
        self.page.wait_for_navigation().await?;
        Ok(true)
    }

    async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let closed = self.browser.close().await;
        if let Err(e) = self.browser.wait().await {
            debug!(error = %e, "Browser process wait failed");
        }
        self.handler.abort();
        closed?;
        info!("Browser closed");
        Ok(())
    }
}
