use thiserror::Error;

use crate::entities::SourceStatus;
use crate::fetcher::FetchError;

/// Appended after the character cap is hit.
pub const TRUNCATION_MARKER: &str = "\n... [truncated]";

/// Why a page produced no usable text. The `Display` form is what gets stored
/// as the source note.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error("blocked")]
    Blocked,

    #[error("empty")]
    Empty,

    #[error("error: {0}")]
    Error(String),
}

/// Outcome of extracting one url: text (possibly empty) plus an optional diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub text: String,
    pub diagnostic: Option<Diagnostic>,
}

impl Extraction {
    pub fn ok(text: String) -> Self {
        Self {
            text,
            diagnostic: None,
        }
    }

    pub fn failed(diagnostic: Diagnostic) -> Self {
        Self {
            text: String::new(),
            diagnostic: Some(diagnostic),
        }
    }

    pub fn from_fetch_error(err: &FetchError) -> Self {
        if err.is_blocked() {
            Self::failed(Diagnostic::Blocked)
        } else {
            Self::failed(Diagnostic::Error(err.to_string()))
        }
    }

    pub fn note(&self) -> Option<String> {
        self.diagnostic.as_ref().map(ToString::to_string)
    }

    pub fn status(&self) -> SourceStatus {
        SourceStatus::from_note(self.note().as_deref())
    }
}

/// Collapse every whitespace run to one space and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize raw extracted text and apply the emptiness and length rules.
///
/// `max_chars` counts characters, not bytes.
pub fn finalize(raw: &str, max_chars: usize) -> Extraction {
    let text = normalize_whitespace(raw);
    if text.is_empty() {
        return Extraction::failed(Diagnostic::Empty);
    }

    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => Extraction::ok(format!("{}{}", &text[..cut], TRUNCATION_MARKER)),
        None => Extraction::ok(text),
    }
}
