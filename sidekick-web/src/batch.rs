//! Concurrent page fetching with a bounded number of browser contexts.

use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use sidekick_common::{BatchConfig, BrowserConfig, Result, SidekickError};
use sidekick_drivers::browser::Driver;

use crate::extract;

/// What a successful fetch yields.
#[derive(Debug, Clone)]
pub struct PageContent {
    /// URL the caller asked for.
    pub url: String,
    /// URL after redirects.
    pub final_url: String,
    pub title: Option<String>,
    pub html: String,
    /// Visible text, whitespace-normalized.
    pub text: String,
}

/// Per-slot outcome: the page, or the error for that URL alone.
pub type PageResult = Result<PageContent>;

/// Fetches one page. The seam exists so the pool can be exercised without a
/// real browser.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<PageContent>;
}

/// Fetcher that opens one WebDriver session per page.
///
/// Sessions are never shared between slots: each fetch gets its own cookies,
/// its own tabs, its own teardown.
pub struct BrowserFetcher {
    config: BrowserConfig,
    load_deadline: Duration,
    settle: Duration,
}

impl BrowserFetcher {
    pub fn new(config: BrowserConfig) -> Self {
        Self {
            config,
            load_deadline: Duration::from_secs(30),
            settle: Duration::from_millis(500),
        }
    }
}

#[async_trait]
impl PageFetcher for BrowserFetcher {
    async fn fetch(&self, url: &str) -> Result<PageContent> {
        let driver = Driver::connect(&self.config).await?;
        let outcome = fetch_with(&driver, url, self.load_deadline, self.settle).await;
        let _ = driver.close().await;
        outcome
    }
}

async fn fetch_with(
    driver: &Driver,
    url: &str,
    deadline: Duration,
    settle: Duration,
) -> Result<PageContent> {
    let page = driver.goto(url).await?;
    page.wait_settled(deadline, settle).await?;

    let html = page.source().await?;
    let final_url = page.current_url().await?;
    let title = extract::extract_title(&html);
    let text = extract::extract_text(&html);

    Ok(PageContent {
        url: url.to_string(),
        final_url,
        title,
        html,
        text,
    })
}

/// Fetch every URL with at most `config.concurrency` pages in flight.
///
/// Returns exactly one result per input URL, in input order. A slot that
/// fails or exceeds `config.page_timeout()` carries its own error; the other
/// slots are unaffected.
pub async fn fetch_all(
    fetcher: &dyn PageFetcher,
    urls: &[String],
    config: &BatchConfig,
) -> Vec<PageResult> {
    let concurrency = config.concurrency.max(1);
    let timeout = config.page_timeout();

    tracing::info!(
        target: "web.batch",
        total = urls.len(),
        concurrency,
        timeout_secs = timeout.as_secs(),
        "batch.start"
    );

    let mut results: Vec<PageResult> = urls
        .iter()
        .map(|url| {
            Err(SidekickError::Navigation(format!(
                "fetch of {url} never completed"
            )))
        })
        .collect();

    let mut slots = stream::iter(urls.iter().enumerate().map(|(index, url)| async move {
        let outcome = match tokio::time::timeout(timeout, fetcher.fetch(url)).await {
            Ok(result) => result,
            Err(_) => Err(SidekickError::Navigation(format!(
                "fetch of {url} timed out after {}s",
                timeout.as_secs()
            ))),
        };
        (index, outcome)
    }))
    .buffer_unordered(concurrency);

    while let Some((index, outcome)) = slots.next().await {
        if let Err(err) = &outcome {
            tracing::warn!(
                target: "web.batch",
                url = %urls[index],
                error = %err,
                "batch.slot_error"
            );
        }
        results[index] = outcome;
    }

    let failed = results.iter().filter(|slot| slot.is_err()).count();
    tracing::info!(
        target: "web.batch",
        total = results.len(),
        failed,
        "batch.done"
    );

    results
}
