use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{info, instrument};

use crate::config::{Config, ENV_TAVILY_API_KEY, require_credential};
use crate::search::{
    WebSearch,
    errors::SearchError,
    types::{SearchResult, TavilySearchRequest, TavilySearchResponse},
};

const SEARCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Tavily web search adapter.
#[derive(Debug, Clone)]
pub struct TavilyClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl TavilyClient {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(SEARCH_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(
            config.tavily_endpoint(),
            config.tavily_api_key().map(str::to_string),
        )
    }
}

#[async_trait]
impl WebSearch for TavilyClient {
    #[instrument(skip(self))]
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let api_key = require_credential(self.api_key.as_deref(), ENV_TAVILY_API_KEY)?;

        let request = TavilySearchRequest {
            api_key,
            query,
            search_depth: "advanced",
            max_results,
        };

        let response: TavilySearchResponse = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let results: Vec<SearchResult> = response
            .results
            .into_iter()
            .filter_map(|r| r.into_search_result())
            .take(max_results)
            .collect();

        if results.is_empty() {
            return Err(SearchError::NoResults);
        }

        info!(count = results.len(), "search returned results");
        Ok(results)
    }
}
