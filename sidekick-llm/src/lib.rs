//! Chat-completion clients behind one trait.
//!
//! Two hosted providers are supported, selected by [`sidekick_common::Settings`]:
//! OpenAI and OpenRouter. Both speak the Chat Completions wire format, and a
//! prompt may attach one image, which travels inline as a `data:` URL.
//!
//! ```no_run
//! use sidekick_common::Settings;
//! use sidekick_llm::traits::Prompt;
//!
//! # async fn demo(settings: Settings) -> sidekick_common::Result<()> {
//! let client = sidekick_llm::client_from_settings(&settings)?;
//! let reply = client
//!     .generate(&Prompt::text("Summarize this repo"), None, Some(256), None)
//!     .await?;
//! println!("{}", reply.text);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use sidekick_common::{LlmProvider, Result, Settings, SidekickError};

pub mod image;
pub mod openai;
pub mod openrouter;
pub mod traits;
mod wire;

use openai::OpenAiClient;
use openrouter::OpenRouterClient;
use traits::LlmClient;

/// Build the configured provider's client.
///
/// Fails with a configuration error when the selected provider has no API
/// key, naming the variable to set.
pub fn client_from_settings(
    settings: &Settings,
) -> Result<Arc<dyn LlmClient + Send + Sync + 'static>> {
    let llm = &settings.llm;
    let key_var = match llm.provider {
        LlmProvider::OpenAi => "OPENAI_API_KEY",
        LlmProvider::OpenRouter => "OPENROUTER_API_KEY",
    };
    let api_key = llm
        .api_key
        .clone()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            SidekickError::Config(format!(
                "{key_var} is not set; add it to the environment or an env file"
            ))
        })?;

    tracing::info!(provider = ?llm.provider, model = %llm.model, "llm.client.selected");

    match llm.provider {
        LlmProvider::OpenAi => {
            let client = match llm.base_url.as_deref() {
                Some(base) => OpenAiClient::with_base_url(api_key, llm.model.clone(), base)?,
                None => OpenAiClient::new(api_key, llm.model.clone())?,
            };
            Ok(Arc::new(client.with_http_config(&settings.http)))
        }
        LlmProvider::OpenRouter => {
            let client = match llm.base_url.as_deref() {
                Some(base) => OpenRouterClient::with_base_url(api_key, llm.model.clone(), base)?,
                None => OpenRouterClient::new(api_key, llm.model.clone())?,
            };
            Ok(Arc::new(client.with_http_config(&settings.http)))
        }
    }
}
