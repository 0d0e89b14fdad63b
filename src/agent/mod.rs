//! Run orchestration: search, extract every hit in order, summarize, persist.
//!
//! Search and summarization failures never abort a run. They are folded into
//! a degraded report (see [`RunOutcome`]) which is stored like any other.
//! Only storage errors reach the caller.

pub mod outcome;

pub use outcome::{RunOutcome, ReportKind, SEARCH_FAILED_HEADING, SUMMARIZATION_FAILED_HEADING};

use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::config::Config;
use crate::entities::{Report, SourceDraft, source_label};
use crate::extractor::{PageExtractor, WebExtractor};
use crate::repositories::ReportRepository;
use crate::search::{TavilyClient, WebSearch};
use crate::summarizer::{OpenAiSummarizer, Summarize};

pub struct Agent {
    searcher: Arc<dyn WebSearch>,
    extractor: Arc<dyn PageExtractor>,
    summarizer: Arc<dyn Summarize>,
    repo: ReportRepository,
    max_results: usize,
}

impl Agent {
    pub fn new(
        searcher: Arc<dyn WebSearch>,
        extractor: Arc<dyn PageExtractor>,
        summarizer: Arc<dyn Summarize>,
        repo: ReportRepository,
        max_results: usize,
    ) -> Self {
        Self {
            searcher,
            extractor,
            summarizer,
            repo,
            max_results,
        }
    }

    /// Wire the production adapters from configuration.
    pub fn from_config(config: &Config, repo: ReportRepository) -> anyhow::Result<Self> {
        Ok(Self::new(
            Arc::new(TavilyClient::from_config(config)?),
            Arc::new(WebExtractor::new(config.extract_max_chars())),
            Arc::new(OpenAiSummarizer::from_config(config)?),
            repo,
            config.search_max_results(),
        ))
    }

    /// Run the pipeline for `query` and store the resulting report.
    #[instrument(skip(self))]
    pub async fn run(&self, query: &str) -> anyhow::Result<Report> {
        let outcome = self.execute(query).await;
        let summary = outcome.summary_markdown(query);

        let report = self
            .repo
            .create_with_sources(query, &summary, outcome.sources())
            .await?;

        info!(
            report_id = report.id,
            sources = outcome.sources().len(),
            kind = ?outcome.kind(),
            "report stored"
        );
        Ok(report)
    }

    /// Everything except persistence.
    pub async fn execute(&self, query: &str) -> RunOutcome {
        let results = match self.searcher.search(query, self.max_results).await {
            Ok(results) => results,
            Err(err) => {
                warn!(error = %err, "search failed");
                return RunOutcome::SearchFailed {
                    error: err.to_string(),
                };
            }
        };

        let mut sources: Vec<SourceDraft> = Vec::with_capacity(results.len());
        for (index, result) in results.into_iter().enumerate() {
            let extraction = self.extractor.extract(&result.url).await;
            sources.push(SourceDraft {
                label: source_label(index + 1),
                title: Some(result.title),
                url: result.url,
                status: extraction.status(),
                note: extraction.note(),
                text: extraction.text,
            });
        }

        match self.summarizer.summarize(query, &sources).await {
            Ok(markdown) => RunOutcome::Completed { markdown, sources },
            Err(err) => {
                warn!(error = %err, "summarization failed");
                RunOutcome::SummarizeFailed {
                    error: err.to_string(),
                    sources,
                }
            }
        }
    }
}
