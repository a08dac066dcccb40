use std::collections::HashMap;

use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use sidekick_common::{BrowserConfig, Result, SidekickError};
use url::Url;
use webdriver::capabilities::Capabilities;

use crate::browser::page::Page;

/// Thin wrapper around a fantoccini WebDriver session.
///
/// One `Driver` is one browsing context: tasks that must not share cookies or
/// open tabs each get their own.
pub struct Driver {
    client: Client,
}

impl Driver {
    /// Open a session against the configured WebDriver endpoint.
    pub async fn connect(config: &BrowserConfig) -> Result<Self> {
        let caps = session_capabilities(config.headless);

        tracing::debug!(
            endpoint = %config.webdriver_url,
            headless = config.headless,
            "browser.session.connect"
        );

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&config.webdriver_url)
            .await
            .map_err(|e| {
                SidekickError::Navigation(format!(
                    "WebDriver session at {} failed: {e}",
                    config.webdriver_url
                ))
            })?;

        Ok(Self { client })
    }

    /// Navigate to `url` and return a handle on the loaded page.
    pub async fn goto(&self, url: &str) -> Result<Page> {
        let target = validate_fetch_url(url)?;
        self.client
            .goto(target.as_str())
            .await
            .map_err(|e| SidekickError::Navigation(format!("navigation to {url} failed: {e}")))?;
        Ok(Page::new(self.client.clone()))
    }

    /// Close the underlying browser session.
    pub async fn close(self) -> Result<()> {
        self.client
            .close()
            .await
            .map_err(|e| SidekickError::Navigation(format!("session close failed: {e}")))?;
        Ok(())
    }
}

fn session_capabilities(headless: bool) -> Capabilities {
    let mut args = vec![
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--window-size=1440,900".to_string(),
    ];
    if headless {
        args.push("--headless".to_string());
        args.push("--disable-gpu".to_string());
    }

    let mut chrome_opts = HashMap::new();
    chrome_opts.insert("args".to_string(), json!(args));

    let mut caps = Capabilities::new();
    caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));
    caps
}

/// Only web URLs may be fetched; `file:` and friends are rejected up front.
fn validate_fetch_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url)
        .map_err(|e| SidekickError::Navigation(format!("invalid URL {url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(SidekickError::Navigation(format!(
            "only http/https URLs can be fetched, got {other}: {url}"
        ))),
    }
}
