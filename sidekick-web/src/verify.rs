//! Model-backed screenshot checks.

use std::path::Path;

use sidekick_common::Result;
use sidekick_llm::image::ImageSource;
use sidekick_llm::traits::LlmClient;

/// Ask `question` about the PNG at `path` and return the model's answer.
///
/// The file is read at call time, so a missing or unreadable screenshot is
/// an I/O error rather than a provider error.
pub async fn verify_screenshot(
    client: &dyn LlmClient,
    path: &Path,
    question: &str,
) -> Result<String> {
    let answer = client
        .ask_about_image(question, ImageSource::File(path.to_path_buf()))
        .await?;
    tracing::debug!(
        target: "web.verify",
        path = %path.display(),
        "verify.answered"
    );
    Ok(answer)
}
