use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Search failed: {0}")]
    Request(String),

    #[error("No results found.")]
    NoResults,
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err.to_string())
    }
}
