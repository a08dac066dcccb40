use serde::{Deserialize, Serialize};

/// One ranked search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    /// Short description Brave renders under the link; empty when absent.
    pub snippet: String,
}

// Brave's web search payload carries many verticals (news, videos, infobox).
// Only the web vertical is decoded; everything else is ignored.

#[derive(Debug, Deserialize)]
pub(crate) struct BraveSearchResponse {
    pub web: Option<WebResults>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WebResults {
    #[serde(default)]
    pub results: Vec<WebItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WebItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    pub description: Option<String>,
}
