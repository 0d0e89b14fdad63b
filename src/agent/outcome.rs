use crate::entities::SourceDraft;

pub const SEARCH_FAILED_HEADING: &str = "# Search failed";
pub const SUMMARIZATION_FAILED_HEADING: &str = "# Summarization failed";

/// How a run ended. Each branch carries only what gets persisted for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed {
        markdown: String,
        sources: Vec<SourceDraft>,
    },
    SearchFailed {
        error: String,
    },
    SummarizeFailed {
        error: String,
        sources: Vec<SourceDraft>,
    },
}

impl RunOutcome {
    /// Markdown stored as the report summary.
    pub fn summary_markdown(&self, query: &str) -> String {
        match self {
            Self::Completed { markdown, .. } => markdown.clone(),
            Self::SearchFailed { error } => format!("{SEARCH_FAILED_HEADING}\n\n> {error}"),
            Self::SummarizeFailed { error, .. } => {
                format!("{SUMMARIZATION_FAILED_HEADING}\n\nQuery: {query}\n\n> {error}")
            }
        }
    }

    pub fn sources(&self) -> &[SourceDraft] {
        match self {
            Self::Completed { sources, .. } | Self::SummarizeFailed { sources, .. } => sources,
            Self::SearchFailed { .. } => &[],
        }
    }

    pub fn kind(&self) -> ReportKind {
        match self {
            Self::Completed { .. } => ReportKind::Completed,
            Self::SearchFailed { .. } => ReportKind::SearchFailed,
            Self::SummarizeFailed { .. } => ReportKind::SummarizeFailed,
        }
    }
}

/// Outcome recovered from a stored summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Completed,
    SearchFailed,
    SummarizeFailed,
}

impl ReportKind {
    pub fn from_summary(summary_md: &str) -> Self {
        if summary_md.starts_with(SEARCH_FAILED_HEADING) {
            Self::SearchFailed
        } else if summary_md.starts_with(SUMMARIZATION_FAILED_HEADING) {
            Self::SummarizeFailed
        } else {
            Self::Completed
        }
    }

    pub fn is_degraded(&self) -> bool {
        !matches!(self, Self::Completed)
    }
}
