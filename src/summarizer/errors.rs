use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("request failed: {0}")]
    Request(String),

    #[error("API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    #[error("model returned an empty completion")]
    EmptyCompletion,
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err.to_string())
    }
}
