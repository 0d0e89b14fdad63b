use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// --- Enums ---

/// Outcome of extracting one source, stored as lowercase text.
#[derive(sqlx::Type, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SourceStatus {
    Ok,
    Blocked,
    Error,
    Skipped,
}

impl SourceStatus {
    /// Map an extraction note to a status. Total: any unknown note is an error.
    pub fn from_note(note: Option<&str>) -> Self {
        match note {
            None => Self::Ok,
            Some("blocked") => Self::Blocked,
            Some("empty") => Self::Skipped,
            Some(_) => Self::Error,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Blocked => "blocked",
            Self::Error => "error",
            Self::Skipped => "skipped",
        }
    }
}

/// --- Tables ---

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, ToSchema)]
pub struct Report {
    pub id: i64,
    pub query: String,
    pub created_at: DateTime<Utc>,
    pub summary_md: String,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, ToSchema)]
pub struct Source {
    pub id: i64,
    pub report_id: i64, // FK -> reports.id
    pub title: Option<String>,
    pub url: String,
    pub status: SourceStatus,
    pub note: Option<String>,
}

/// --- Transient ---

/// One search result after extraction, before it is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDraft {
    pub label: String, // S1, S2, ... by position
    pub title: Option<String>,
    pub url: String,
    pub text: String,
    pub status: SourceStatus,
    pub note: Option<String>,
}

/// Positional citation label for the 1-based `position`.
pub fn source_label(position: usize) -> String {
    format!("S{position}")
}
