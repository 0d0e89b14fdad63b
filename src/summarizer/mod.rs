pub mod citations;
pub mod client;
pub mod errors;
pub mod prompt;

pub use citations::linkify_citations;
pub use client::OpenAiSummarizer;
pub use errors::LlmError;

use async_trait::async_trait;

use crate::entities::SourceDraft;

/// Writes the markdown report for a query from its extracted sources.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Summarize: Send + Sync {
    async fn summarize(&self, query: &str, sources: &[SourceDraft]) -> Result<String, LlmError>;
}
