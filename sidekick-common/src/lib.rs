//! Common types and utilities shared across Sidekick crates.
//!
//! This crate defines the resolved runtime settings, observability helpers,
//! and shared error types used throughout the Sidekick workspace. It is
//! intentionally lightweight so that all crates can depend on it without
//! introducing heavy transitive costs.
//!
//! # Overview
//!
//! - [`Settings`]: Immutable runtime configuration, one section per tool
//! - [`LlmSettings`] and [`LlmProvider`]: LLM provider selection
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`SidekickError`] and [`Result`]: Shared error handling
//!
//! # Examples
//!
//! Constructing a default configuration:
//!
//! ```rust
//! use sidekick_common::{LlmProvider, Settings};
//!
//! let mut settings = Settings::default();
//! settings.browser.headless = true;
//! assert_eq!(settings.llm.provider, LlmProvider::OpenAi);
//! assert_eq!(settings.batch.concurrency, 5);
//! ```
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub mod observability;

/// Supported LLM providers.
///
/// Both speak the Chat Completions wire format; they differ in endpoint and
/// auth headers. See the `sidekick-llm` crate for the concrete clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    OpenAi,
    OpenRouter,
}

impl LlmProvider {
    /// Model used when none is configured.
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4o",
            Self::OpenRouter => "openai/gpt-4o",
        }
    }
}

impl std::str::FromStr for LlmProvider {
    type Err = SidekickError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "openrouter" => Ok(Self::OpenRouter),
            other => Err(SidekickError::Config(format!(
                "unknown LLM provider: {other} (expected \"openai\" or \"openrouter\")"
            ))),
        }
    }
}

/// Configuration for the LLM client wrapper.
///
/// `api_key` holds the key for the *selected* provider; the loader picks it
/// from the matching environment key at resolve time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    pub provider: LlmProvider,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub model: String,
    /// Override for OpenAI-compatible gateways; `None` uses the provider default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: LlmProvider::OpenAi,
            api_key: None,
            model: LlmProvider::OpenAi.default_model().to_string(),
            base_url: None,
        }
    }
}

/// Configuration for the search client wrapper.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brave_api_key: Option<String>,
}

/// Configuration for browser automation sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// WebDriver endpoint the sessions connect to (chromedriver).
    pub webdriver_url: String,
    /// Whether to run without a visible window.
    pub headless: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            headless: true,
        }
    }
}

/// Configuration for the concurrent batch fetcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Maximum number of browsing contexts open at once.
    pub concurrency: usize,
    /// Per-fetch deadline in seconds; a slot that exceeds it records an error.
    pub page_timeout_secs: u64,
}

impl BatchConfig {
    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: 5,
            page_timeout_secs: 30,
        }
    }
}

/// Configuration for the shared HTTP client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Extra attempts after the first; clamped to at most one by the client.
    pub retries: usize,
    /// Per-request deadline in seconds.
    pub timeout_secs: u64,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            retries: 0,
            timeout_secs: 30,
        }
    }
}

/// Resolved runtime settings for the toolkit.
///
/// Built once at process start by the `sidekick-config` loader and treated
/// as immutable afterwards. Each tool reads only its own section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    pub llm: LlmSettings,
    pub search: SearchSettings,
    pub browser: BrowserConfig,
    pub batch: BatchConfig,
    pub http: HttpConfig,
}

/// Error types used across the toolkit.
#[derive(thiserror::Error, Debug)]
pub enum SidekickError {
    /// Credentials or settings were missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An upstream API call failed: non-success status, malformed payload,
    /// rate limit.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Browser automation failed: session creation, unreachable URL,
    /// navigation or render timeout.
    #[error("Navigation error: {0}")]
    Navigation(String),

    /// A local filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenient alias for results that use [`SidekickError`].
pub type Result<T> = std::result::Result<T, SidekickError>;
