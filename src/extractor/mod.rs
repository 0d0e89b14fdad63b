pub mod model;
pub mod pdf;
pub mod reader;

#[cfg(test)]
mod tests;

pub use model::{Diagnostic, Extraction, TRUNCATION_MARKER, finalize, normalize_whitespace};

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::fetcher::{self, PageBody, PageResponse};

/// Turns a url into readable text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageExtractor: Send + Sync {
    /// Never fails: every problem is folded into [`Extraction::diagnostic`].
    async fn extract(&self, url: &str) -> Extraction;
}

/// Fetches pages over HTTP and extracts HTML or PDF text.
#[derive(Debug, Clone)]
pub struct WebExtractor {
    max_chars: usize,
}

impl WebExtractor {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }
}

impl Default for WebExtractor {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_EXTRACT_MAX_CHARS)
    }
}

#[async_trait]
impl PageExtractor for WebExtractor {
    #[instrument(skip(self))]
    async fn extract(&self, url: &str) -> Extraction {
        match fetcher::fetch(url).await {
            Ok(response) => extract_response(&response, self.max_chars).await,
            Err(err) => {
                debug!(error = %err, "fetch failed");
                Extraction::from_fetch_error(&err)
            }
        }
    }
}

/// Extract text from an already fetched page.
pub async fn extract_response(resp: &PageResponse, max_chars: usize) -> Extraction {
    let raw = match &resp.body {
        PageBody::Pdf => pdf::extract_pdf(resp.body_raw.clone()).await,
        PageBody::Html { text, .. } => Ok(reader::extract(text, &resp.url_final)),
    };

    match raw {
        Ok(raw) => finalize(&raw, max_chars),
        Err(err) => {
            debug!(error = %err, "pdf extraction failed");
            Extraction::failed(Diagnostic::Error(err.to_string()))
        }
    }
}
