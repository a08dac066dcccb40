//! OpenRouter chat-completions client.
//!
//! Speaks the same wire format as OpenAI. The differences are the base URL
//! and the optional attribution headers OpenRouter reads for its app
//! rankings.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use sidekick_common::{HttpConfig, Result, SidekickError};
use sidekick_http::{Auth, HttpClient, RequestOpts};

use crate::traits::{LlmClient, LlmResponse, Prompt};
use crate::wire::{self, ChatResponse, ModelsPage};

const OPENROUTER_API_BASE: &str = "https://openrouter.ai/api/v1/";

const REFERER_HEADER: &str = "http-referer";
const TITLE_HEADER: &str = "x-title";

/// Client for the OpenRouter gateway.
pub struct OpenRouterClient {
    client: HttpClient,
    api_key: String,
    model: String,
    attribution: HeaderMap,
}

impl OpenRouterClient {
    pub fn new(api_key: String, model: String) -> Result<Self> {
        Self::with_base_url(api_key, model, OPENROUTER_API_BASE)
    }

    pub fn with_base_url(api_key: String, model: String, base_url: &str) -> Result<Self> {
        let client = HttpClient::new(base_url)
            .map_err(|e| SidekickError::Config(format!("invalid OpenRouter base URL: {e}")))?;
        Ok(Self {
            client,
            api_key,
            model,
            attribution: HeaderMap::new(),
        })
    }

    /// Attach the `HTTP-Referer` / `X-Title` pair OpenRouter uses to credit
    /// the calling app.
    pub fn with_attribution(mut self, referer: &str, title: &str) -> Result<Self> {
        let referer = HeaderValue::from_str(referer)
            .map_err(|e| SidekickError::Config(format!("invalid referer header: {e}")))?;
        let title = HeaderValue::from_str(title)
            .map_err(|e| SidekickError::Config(format!("invalid title header: {e}")))?;
        self.attribution
            .insert(HeaderName::from_static(REFERER_HEADER), referer);
        self.attribution
            .insert(HeaderName::from_static(TITLE_HEADER), title);
        Ok(self)
    }

    /// Apply shared HTTP tuning (timeout, retry budget).
    pub fn with_http_config(mut self, http: &HttpConfig) -> Self {
        self.client = self
            .client
            .with_timeout(http.timeout())
            .with_retries(http.retries);
        self
    }

    fn request_opts(&self) -> RequestOpts<'_> {
        RequestOpts {
            auth: Some(Auth::Bearer(&self.api_key)),
            headers: (!self.attribution.is_empty()).then(|| self.attribution.clone()),
            ..Default::default()
        }
    }
}

#[async_trait]
impl LlmClient for OpenRouterClient {
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
            .post_json_opts(wire::CHAT_COMPLETIONS_PATH, &request, self.request_opts())
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
        match self
            .client
            .get_json::<ModelsPage>(wire::MODELS_PATH, self.request_opts())
            .await
        {
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
