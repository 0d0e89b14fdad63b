//! Configuration handling for the application.
//!
//! Everything is read from environment variables with development defaults.
//! Provider credentials are optional here: a missing key only becomes an
//! error when the stage that needs it runs (see [`require_credential`]).

use std::env;
use thiserror::Error;

/// Environment variable names. Public so tests and binaries can refer to them.
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_PORT: &str = "PORT";
pub const ENV_SESSION_SECRET: &str = "SESSION_SECRET";
pub const ENV_TAVILY_API_KEY: &str = "TAVILY_API_KEY";
pub const ENV_TAVILY_ENDPOINT: &str = "TAVILY_ENDPOINT";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_OPENAI_MODEL: &str = "OPENAI_MODEL";
pub const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_SEARCH_MAX_RESULTS: &str = "SEARCH_MAX_RESULTS";
pub const ENV_EXTRACT_MAX_CHARS: &str = "EXTRACT_MAX_CHARS";

/// Default development values used when environment variables are absent.
const DEFAULT_DATABASE_URL: &str = "sqlite://data/dossier.db";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_SESSION_SECRET: &str = "dev-secret";
const DEFAULT_TAVILY_ENDPOINT: &str = "https://api.tavily.com/search";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_SEARCH_MAX_RESULTS: usize = 3;
pub const DEFAULT_EXTRACT_MAX_CHARS: usize = 15_000;

/// Application runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    database_url: String,
    port: u16,
    session_secret: String,
    tavily_api_key: Option<String>,
    tavily_endpoint: String,
    openai_api_key: Option<String>,
    openai_model: String,
    openai_base_url: String,
    search_max_results: usize,
    extract_max_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            port: DEFAULT_PORT,
            session_secret: DEFAULT_SESSION_SECRET.to_string(),
            tavily_api_key: None,
            tavily_endpoint: DEFAULT_TAVILY_ENDPOINT.to_string(),
            openai_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            search_max_results: DEFAULT_SEARCH_MAX_RESULTS,
            extract_max_chars: DEFAULT_EXTRACT_MAX_CHARS,
        }
    }
}

impl Config {
    /// Load from environment variables, falling back to development defaults.
    ///
    /// Only malformed numeric values fail here.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            database_url: env_string(ENV_DATABASE_URL).unwrap_or(defaults.database_url),
            port: env_parse(ENV_PORT)?.unwrap_or(defaults.port),
            session_secret: env_string(ENV_SESSION_SECRET).unwrap_or(defaults.session_secret),
            tavily_api_key: env_string(ENV_TAVILY_API_KEY),
            tavily_endpoint: env_string(ENV_TAVILY_ENDPOINT).unwrap_or(defaults.tavily_endpoint),
            openai_api_key: env_string(ENV_OPENAI_API_KEY),
            openai_model: env_string(ENV_OPENAI_MODEL).unwrap_or(defaults.openai_model),
            openai_base_url: env_string(ENV_OPENAI_BASE_URL).unwrap_or(defaults.openai_base_url),
            search_max_results: env_parse(ENV_SEARCH_MAX_RESULTS)?
                .unwrap_or(defaults.search_max_results),
            extract_max_chars: env_parse(ENV_EXTRACT_MAX_CHARS)?
                .unwrap_or(defaults.extract_max_chars),
        })
    }

    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = url.into();
        self
    }

    pub fn with_tavily(mut self, api_key: Option<String>, endpoint: impl Into<String>) -> Self {
        self.tavily_api_key = api_key;
        self.tavily_endpoint = endpoint.into();
        self
    }

    pub fn with_openai(mut self, api_key: Option<String>, base_url: impl Into<String>) -> Self {
        self.openai_api_key = api_key;
        self.openai_base_url = base_url.into();
        self
    }

    pub fn with_session_secret(mut self, secret: impl Into<String>) -> Self {
        self.session_secret = secret.into();
        self
    }

    pub fn with_search_max_results(mut self, max_results: usize) -> Self {
        self.search_max_results = max_results;
        self
    }

    /// SQLite connection string.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }
    /// TCP bind address (host:port) for the HTTP server.
    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
    /// Secret used to sign flash cookies.
    pub fn session_secret(&self) -> &str {
        &self.session_secret
    }
    pub fn tavily_api_key(&self) -> Option<&str> {
        self.tavily_api_key.as_deref()
    }
    pub fn tavily_endpoint(&self) -> &str {
        &self.tavily_endpoint
    }
    pub fn openai_api_key(&self) -> Option<&str> {
        self.openai_api_key.as_deref()
    }
    pub fn openai_model(&self) -> &str {
        &self.openai_model
    }
    pub fn openai_base_url(&self) -> &str {
        &self.openai_base_url
    }
    pub fn search_max_results(&self) -> usize {
        self.search_max_results
    }
    pub fn extract_max_chars(&self) -> usize {
        self.extract_max_chars
    }
}

/// A provider key at the moment it is needed; `env_key` names it in the error.
pub fn require_credential<'a>(
    value: Option<&'a str>,
    env_key: &'static str,
) -> Result<&'a str, ConfigError> {
    value.ok_or(ConfigError::MissingCredential(env_key))
}

/// Errors that can occur while building or using a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Missing {0}.")]
    MissingCredential(&'static str),
}

/// Trimmed env value; empty strings count as unset.
fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_parse<T>(key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env_string(key)
        .map(|raw| {
            raw.parse::<T>().map_err(|e| ConfigError::InvalidValue {
                field: key,
                reason: e.to_string(),
            })
        })
        .transpose()
}
