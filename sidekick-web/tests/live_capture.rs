use sidekick_common::BrowserConfig;
use sidekick_web::capture::{CaptureOpts, capture_screenshot};

/// Needs a WebDriver server on the default endpoint:
///
/// ```sh
/// chromedriver --port=9515
/// ```
#[tokio::test]
#[ignore]
async fn capture_example_dot_com() -> sidekick_common::Result<()> {
    let dir = tempfile::tempdir()?;
    let output = dir.path().join("example.png");

    let saved = capture_screenshot(
        &BrowserConfig::default(),
        "https://example.com",
        &output,
        &CaptureOpts::default(),
    )
    .await?;

    assert_eq!(saved, output);
    let bytes = std::fs::metadata(&saved)?.len();
    assert!(bytes > 0, "screenshot file should not be empty");
    Ok(())
}
