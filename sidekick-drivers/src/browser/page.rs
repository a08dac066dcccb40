use std::time::{Duration, Instant};

use fantoccini::error::CmdError;
use fantoccini::Client;
use sidekick_common::{Result, SidekickError};

const READY_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Handle on a navigated page.
pub struct Page {
    client: Client,
}

impl Page {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Full HTML source.
    pub async fn source(&self) -> Result<String> {
        self.client.source().await.map_err(cmd_err("page source"))
    }

    /// Document title.
    pub async fn title(&self) -> Result<String> {
        self.client.title().await.map_err(cmd_err("page title"))
    }

    /// URL after any redirects.
    pub async fn current_url(&self) -> Result<String> {
        self.client
            .current_url()
            .await
            .map(|url| url.to_string())
            .map_err(cmd_err("current URL"))
    }

    /// PNG screenshot of the viewport.
    pub async fn screenshot_png(&self) -> Result<Vec<u8>> {
        self.client
            .screenshot()
            .await
            .map_err(cmd_err("screenshot"))
    }

    /// Wait until the document reports itself complete, then give dynamic
    /// content a fixed settle window. Errs when `deadline` passes first.
    pub async fn wait_settled(&self, deadline: Duration, settle: Duration) -> Result<()> {
        let started = Instant::now();
        loop {
            let state = self
                .client
                .execute("return document.readyState;", vec![])
                .await
                .map_err(cmd_err("readyState probe"))?;
            if state.as_str() == Some("complete") {
                break;
            }
            if started.elapsed() >= deadline {
                return Err(SidekickError::Navigation(format!(
                    "page did not finish loading within {}s",
                    deadline.as_secs()
                )));
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }
        tokio::time::sleep(settle).await;
        Ok(())
    }
}

fn cmd_err(what: &'static str) -> impl FnOnce(CmdError) -> SidekickError {
    move |e| SidekickError::Navigation(format!("{what} failed: {e}"))
}
