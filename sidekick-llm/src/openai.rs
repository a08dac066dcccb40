//! OpenAI chat-completions client.

use std::time::Instant;

use async_trait::async_trait;
use sidekick_common::{HttpConfig, Result, SidekickError};
use sidekick_http::{Auth, HttpClient, RequestOpts};

use crate::traits::{LlmClient, LlmResponse, Prompt};
use crate::wire::{self, ChatResponse, ModelsPage};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1/";

/// Client for the hosted OpenAI API.
pub struct OpenAiClient {
    client: HttpClient,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    /// Create a client against the hosted endpoint.
    pub fn new(api_key: String, model: String) -> Result<Self> {
        Self::with_base_url(api_key, model, OPENAI_API_BASE)
    }

    /// Create a client against a compatible gateway or proxy.
    pub fn with_base_url(api_key: String, model: String, base_url: &str) -> Result<Self> {
        let client = HttpClient::new(base_url)
            .map_err(|e| SidekickError::Config(format!("invalid OpenAI base URL: {e}")))?;
        Ok(Self {
            client,
            api_key,
            model,
        })
    }

    /// Apply shared HTTP tuning (timeout, retry budget).
    pub fn with_http_config(mut self, http: &HttpConfig) -> Self {
        self.client = self
            .client
            .with_timeout(http.timeout())
            .with_retries(http.retries);
        self
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn generate(
        &self,
        prompt: &Prompt,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse> {
        let request =
            wire::build_chat_request(&self.model, prompt, system_prompt, max_tokens, temperature)
                .await?;

        tracing::debug!(
            model = %self.model,
            has_image = prompt.has_image(),
            "llm.generate.start"
        );
        let started = Instant::now();

        let response: ChatResponse = self
            .client
            .post_json(wire::CHAT_COMPLETIONS_PATH, Some(&self.api_key), &request)
            .await
            .map_err(wire::http_to_provider)?;

        let result = wire::into_llm_response(response)?;
        tracing::info!(
            model = result.model.as_deref().unwrap_or(&self.model),
            tokens_used = ?result.tokens_used,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "llm.generate.success"
        );
        Ok(result)
    }

    async fn health_check(&self) -> Result<bool> {
        let opts = RequestOpts {
            auth: Some(Auth::Bearer(&self.api_key)),
            ..Default::default()
        };
        match self.client.get_json::<ModelsPage>(wire::MODELS_PATH, opts).await {
            Ok(page) => {
                let listed = page.data.iter().any(|entry| entry.id == self.model);
                tracing::debug!(model = %self.model, listed, "llm.health.ok");
                Ok(true)
            }
            Err(err) => {
                tracing::warn!(error = %err, "llm.health.failed");
                Ok(false)
            }
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
