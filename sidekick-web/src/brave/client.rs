use std::borrow::Cow;
use std::time::Instant;

use reqwest::header::{HeaderName, HeaderValue};
use sidekick_common::{Result, Settings, SidekickError};
use sidekick_http::{Auth, HttpClient, RequestOpts};

use crate::brave::types::{BraveSearchResponse, SearchHit};

const BRAVE_API_BASE: &str = "https://api.search.brave.com";
const SEARCH_PATH: &str = "res/v1/web/search";

/// Brave serves at most this many web results per request.
const MAX_PAGE_SIZE: usize = 20;
const DEFAULT_LIMIT: usize = 10;

/// Minimal client for the Brave Search API (web vertical).
#[derive(Clone)]
pub struct BraveSearchClient {
    http: HttpClient,
    token: String,
}

impl BraveSearchClient {
    pub fn new(token: String) -> Result<Self> {
        Self::with_base_url(token, BRAVE_API_BASE)
    }

    pub fn with_base_url(token: String, base_url: &str) -> Result<Self> {
        let http = HttpClient::new(base_url)
            .map_err(|e| SidekickError::Config(format!("invalid Brave base URL: {e}")))?;
        Ok(Self { http, token })
    }

    /// Build from resolved settings; fails when no key is configured.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let token = settings
            .search
            .brave_api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                SidekickError::Config(
                    "BRAVE_API_KEY is not set; add it to the environment or an env file".into(),
                )
            })?;
        let mut client = Self::new(token)?;
        client.http = client.http.with_timeout(settings.http.timeout());
        Ok(client)
    }

    /// Run a web search and return hits in Brave's display order.
    ///
    /// `limit` caps the number of hits; `None` asks for a default page. A
    /// query that matches nothing is an empty `Vec`, not an error.
    pub async fn search(&self, query: &str, limit: Option<usize>) -> Result<Vec<SearchHit>> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).max(1);
        let count = limit.min(MAX_PAGE_SIZE);

        let query_snippet = if query.chars().count() > 160 {
            let cut: String = query.chars().take(160).collect();
            format!("{cut}…")
        } else {
            query.to_string()
        };
        let started = Instant::now();
        tracing::info!(
            target: "web.brave",
            query = %query_snippet,
            count,
            "brave.search.start"
        );

        let auth = Auth::Header {
            name: HeaderName::from_static("x-subscription-token"),
            value: HeaderValue::from_str(&self.token)
                .map_err(|e| SidekickError::Config(format!("invalid Brave API key: {e}")))?,
        };
        let params: Vec<(&str, Cow<'_, str>)> =
            vec![("q", query.into()), ("count", count.to_string().into())];

        let response: BraveSearchResponse = match self
            .http
            .get_json(
                SEARCH_PATH,
                RequestOpts {
                    auth: Some(auth),
                    query: Some(params),
                    retries: Some(0),
                    ..Default::default()
                },
            )
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    target: "web.brave",
                    query = %query_snippet,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %e,
                    "brave.search.error"
                );
                return Err(SidekickError::Provider(format!("Brave search failed: {e}")));
            }
        };

        let hits = collect_hits(response, limit);
        tracing::info!(
            target: "web.brave",
            query = %query_snippet,
            elapsed_ms = started.elapsed().as_millis() as u64,
            hit_count = hits.len(),
            "brave.search.success"
        );
        Ok(hits)
    }
}

fn collect_hits(response: BraveSearchResponse, limit: usize) -> Vec<SearchHit> {
    let Some(web) = response.web else {
        return Vec::new();
    };
    web.results
        .into_iter()
        .filter(|item| !item.url.is_empty())
        .take(limit)
        .map(|item| SearchHit {
            title: item.title,
            url: item.url,
            snippet: item.description.unwrap_or_default(),
        })
        .collect()
}
