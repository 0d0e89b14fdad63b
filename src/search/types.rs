use serde::{Deserialize, Serialize};

/// Placeholder title for results the provider returned without one.
pub const UNTITLED: &str = "(No title)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct TavilySearchRequest<'a> {
    pub api_key: &'a str,
    pub query: &'a str,
    pub search_depth: &'static str,
    pub max_results: usize,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TavilySearchResponse {
    #[serde(default)]
    pub results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TavilyResult {
    pub title: Option<String>,
    pub url: Option<String>,
    pub content: Option<String>,
}

impl TavilyResult {
    /// `None` when the provider left out the url.
    pub fn into_search_result(self) -> Option<SearchResult> {
        let url = self.url.filter(|u| !u.trim().is_empty())?;
        Some(SearchResult {
            title: self
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| UNTITLED.to_string()),
            url,
            snippet: self.content.unwrap_or_default(),
        })
    }
}
