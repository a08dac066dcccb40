//! Loader for the toolkit's environment-file configuration.
//!
//! Keys are resolved through an explicit ordered lookup list: the process
//! environment first, then `.env.local`, `.env`, and `.env.example`. The
//! first definition of a key wins. The list is walked exactly once and the
//! outcome is materialised into an immutable [`Settings`]; nothing re-reads
//! files or the environment afterwards.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use sidekick_common::observability::key_preview;
use sidekick_common::{
    BatchConfig, BrowserConfig, HttpConfig, LlmProvider, LlmSettings, Result, SearchSettings,
    Settings, SidekickError,
};

/// File names consulted by [`SettingsLoader::new`], highest precedence first.
pub const DEFAULT_ENV_FILES: [&str; 3] = [".env.local", ".env", ".env.example"];

enum Source {
    File(PathBuf),
    Inline(String),
}

/// Builder hides the env-file wiring (ordered files + inline snippets).
pub struct SettingsLoader {
    sources: Vec<Source>,
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsLoader {
    /// Start with the standard lookup list relative to the working
    /// directory: `.env.local`, then `.env`, then `.env.example`.
    ///
    /// Missing files are skipped silently; the process environment always
    /// outranks every file.
    pub fn new() -> Self {
        Self {
            sources: DEFAULT_ENV_FILES
                .iter()
                .map(|name| Source::File(PathBuf::from(name)))
                .collect(),
        }
    }

    /// The standard lookup list rooted in `dir` instead of the working
    /// directory.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            sources: DEFAULT_ENV_FILES
                .iter()
                .map(|name| Source::File(dir.as_ref().join(name)))
                .collect(),
        }
    }

    /// Append a file to the end of the lookup list (lowest precedence so
    /// far). The file may be absent.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.sources.push(Source::File(path.as_ref().to_path_buf()));
        self
    }

    /// Append an inline `KEY=VALUE` snippet to the lookup list. Used by
    /// tests and hosts that assemble configuration programmatically.
    ///
    /// ```
    /// use sidekick_config::SettingsLoader;
    ///
    /// let settings = SettingsLoader::new()
    ///     .with_env_str("SIDEKICK_LLM_MODEL=gpt-4o-mini\nSIDEKICK_FETCH_CONCURRENCY=3")
    ///     .load()
    ///     .expect("valid settings");
    ///
    /// assert_eq!(settings.llm.model, "gpt-4o-mini");
    /// assert_eq!(settings.batch.concurrency, 3);
    /// ```
    pub fn with_env_str(mut self, snippet: &str) -> Self {
        self.sources.push(Source::Inline(snippet.to_string()));
        self
    }

    /// Walk the ordered sources once and materialise [`Settings`].
    ///
    /// Unreadable or unparsable sources are a `Config` error; so are
    /// malformed numeric or boolean values. A summary of which keys resolved
    /// is logged with secrets redacted.
    ///
    /// ```
    /// use sidekick_config::SettingsLoader;
    ///
    /// let settings = SettingsLoader::new().load().expect("defaults");
    /// assert_eq!(settings.browser.webdriver_url, "http://localhost:9515");
    /// ```
    pub fn load(self) -> Result<Settings> {
        let resolved = self.resolve()?;
        let settings = build_settings(&resolved)?;
        log_summary(&settings);
        Ok(settings)
    }

    fn resolve(self) -> Result<ResolvedEnv> {
        let mut file_values: HashMap<String, String> = HashMap::new();
        for source in self.sources {
            match source {
                Source::File(path) => {
                    if !path.exists() {
                        continue;
                    }
                    let entries = dotenvy::from_path_iter(&path).map_err(|e| {
                        SidekickError::Config(format!("failed to read {}: {e}", path.display()))
                    })?;
                    for entry in entries {
                        let (key, value) = entry.map_err(|e| {
                            SidekickError::Config(format!(
                                "failed to parse {}: {e}",
                                path.display()
                            ))
                        })?;
                        file_values.entry(key).or_insert(value);
                    }
                }
                Source::Inline(snippet) => {
                    for entry in dotenvy::from_read_iter(Cursor::new(snippet)) {
                        let (key, value) = entry.map_err(|e| {
                            SidekickError::Config(format!("failed to parse inline env: {e}"))
                        })?;
                        file_values.entry(key).or_insert(value);
                    }
                }
            }
        }
        Ok(ResolvedEnv { file_values })
    }
}

/// One first-wins map over the file sources; the process environment is
/// consulted before it on every lookup.
struct ResolvedEnv {
    file_values: HashMap<String, String>,
}

impl ResolvedEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .or_else(|| self.file_values.get(key).cloned())
    }
}

fn build_settings(env: &ResolvedEnv) -> Result<Settings> {
    let provider = match env.get("SIDEKICK_LLM_PROVIDER") {
        Some(raw) => raw.parse::<LlmProvider>()?,
        None => LlmProvider::OpenAi,
    };
    let api_key = match provider {
        LlmProvider::OpenAi => env.get("OPENAI_API_KEY"),
        LlmProvider::OpenRouter => env.get("OPENROUTER_API_KEY"),
    };
    let llm = LlmSettings {
        provider,
        api_key,
        model: env
            .get("SIDEKICK_LLM_MODEL")
            .unwrap_or_else(|| provider.default_model().to_string()),
        base_url: env.get("SIDEKICK_LLM_BASE_URL"),
    };

    let search = SearchSettings {
        brave_api_key: env.get("BRAVE_API_KEY"),
    };

    let browser_defaults = BrowserConfig::default();
    let browser = BrowserConfig {
        webdriver_url: env
            .get("SIDEKICK_WEBDRIVER_URL")
            .unwrap_or(browser_defaults.webdriver_url),
        headless: parse_bool(env, "SIDEKICK_BROWSER_HEADLESS", browser_defaults.headless)?,
    };

    let batch_defaults = BatchConfig::default();
    let batch = BatchConfig {
        concurrency: parse_number(env, "SIDEKICK_FETCH_CONCURRENCY", batch_defaults.concurrency)?,
        page_timeout_secs: parse_number(
            env,
            "SIDEKICK_PAGE_TIMEOUT_SECS",
            batch_defaults.page_timeout_secs,
        )?,
    };

    let http_defaults = HttpConfig::default();
    let http = HttpConfig {
        retries: parse_number(env, "SIDEKICK_HTTP_RETRIES", http_defaults.retries)?,
        timeout_secs: parse_number(env, "SIDEKICK_HTTP_TIMEOUT_SECS", http_defaults.timeout_secs)?,
    };

    Ok(Settings {
        llm,
        search,
        browser,
        batch,
        http,
    })
}

fn parse_number<T>(env: &ResolvedEnv, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env.get(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| SidekickError::Config(format!("invalid {key} ({raw:?}): {e}"))),
    }
}

fn parse_bool(env: &ResolvedEnv, key: &str, default: bool) -> Result<bool> {
    match env.get(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            other => Err(SidekickError::Config(format!(
                "invalid {key} ({other:?}): expected a boolean"
            ))),
        },
    }
}

fn log_summary(settings: &Settings) {
    fn preview_opt(value: &Option<String>) -> String {
        match value {
            Some(v) if !v.is_empty() => key_preview(v),
            _ => "<not set>".to_string(),
        }
    }

    tracing::info!(
        provider = ?settings.llm.provider,
        model = %settings.llm.model,
        llm_api_key = %preview_opt(&settings.llm.api_key),
        brave_api_key = %preview_opt(&settings.search.brave_api_key),
        webdriver_url = %settings.browser.webdriver_url,
        headless = settings.browser.headless,
        concurrency = settings.batch.concurrency,
        page_timeout_secs = settings.batch.page_timeout_secs,
        "settings.loaded"
    );
}
