//! Screenshot capture: navigate, settle, shoot, persist.

use std::path::{Path, PathBuf};
use std::time::Duration;

use sidekick_common::{BrowserConfig, Result, SidekickError};
use sidekick_drivers::browser::Driver;

/// How long a page may keep loading before capture gives up.
const DEFAULT_LOAD_DEADLINE: Duration = Duration::from_secs(30);
/// Fixed pause after load so late-rendering content makes it into the shot.
const DEFAULT_SETTLE: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct CaptureOpts {
    pub load_deadline: Duration,
    pub settle: Duration,
}

impl Default for CaptureOpts {
    fn default() -> Self {
        Self {
            load_deadline: DEFAULT_LOAD_DEADLINE,
            settle: DEFAULT_SETTLE,
        }
    }
}

/// Navigate to `url` in a fresh browser session and write a PNG screenshot
/// to `output`.
///
/// The session is closed on every exit path, including navigation and
/// capture failures. Navigation trouble (unreachable URL, load timeout)
/// reports as a navigation error; a write that fails reports as I/O.
pub async fn capture_screenshot(
    config: &BrowserConfig,
    url: &str,
    output: &Path,
    opts: &CaptureOpts,
) -> Result<PathBuf> {
    let driver = Driver::connect(config).await?;

    let captured = capture_png(&driver, url, opts).await;
    let _ = driver.close().await;
    let png = captured?;

    tokio::fs::write(output, &png).await?;

    tracing::info!(
        target: "web.capture",
        url,
        output = %output.display(),
        bytes = png.len(),
        "capture.saved"
    );
    Ok(output.to_path_buf())
}

async fn capture_png(driver: &Driver, url: &str, opts: &CaptureOpts) -> Result<Vec<u8>> {
    let page = driver.goto(url).await?;
    page.wait_settled(opts.load_deadline, opts.settle).await?;

    let png = page.screenshot_png().await?;
    if png.is_empty() {
        return Err(SidekickError::Navigation(format!(
            "screenshot of {url} came back empty"
        )));
    }
    Ok(png)
}
