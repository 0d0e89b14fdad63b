pub mod client;
pub mod errors;
pub mod types;

pub use client::TavilyClient;
pub use errors::SearchError;
pub use types::{SearchResult, UNTITLED};

use async_trait::async_trait;

/// A web search provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Top `max_results` hits in provider ranking order. Never returns an
    /// empty list: no hits is [`SearchError::NoResults`].
    async fn search(&self, query: &str, max_results: usize)
    -> Result<Vec<SearchResult>, SearchError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::search::types::TavilyResult;

    #[test]
    fn test_result_defaults() {
        let result = TavilyResult {
            title: None,
            url: Some("https://example.com".to_string()),
            content: None,
        }
        .into_search_result()
        .unwrap();

        assert_eq!(result.title, UNTITLED);
        assert_eq!(result.snippet, "");
    }

    #[test]
    fn test_result_without_url_is_dropped() {
        let result = TavilyResult {
            title: Some("Orphan".to_string()),
            url: None,
            content: Some("text".to_string()),
        };
        assert!(result.into_search_result().is_none());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(SearchError::NoResults.to_string(), "No results found.");
        assert_eq!(
            SearchError::Request("HTTP 502".to_string()).to_string(),
            "Search failed: HTTP 502"
        );
        assert_eq!(
            SearchError::from(ConfigError::MissingCredential("TAVILY_API_KEY")).to_string(),
            "Missing TAVILY_API_KEY."
        );
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_any_request() {
        // unroutable endpoint: reaching the network would fail differently
        let client = TavilyClient::new("http://127.0.0.1:9/search", None).unwrap();
        let err = client.search("rust", 3).await.unwrap_err();
        assert!(matches!(err, SearchError::Config(_)));
    }
}
