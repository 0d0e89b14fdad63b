use chrono::NaiveDate;

use crate::entities::SourceDraft;
use crate::search::UNTITLED;

pub const SYSTEM_PROMPT: &str = "You are a careful research assistant. You write concise, \
structured markdown reports with clear headings, bullet points, and short sentences. \
You cite sources by label only (for example [S1]); links are added afterwards.";

const NO_TEXT: &str = "(no extractable text)";
const SOURCE_SEPARATOR: &str = "\n\n---\n\n";

/// Render the output template with the date line filled in.
fn report_template(today: NaiveDate) -> String {
    format!(
        "Create a short, structured report in Markdown with these sections:\n\
         # Title\n\
         **Query:** <the user's query>\n\
         **Date:** {today}\n\n\
         ## Key Findings\n- 4–8 bullets with crisp, evidence-backed points.\n\n\
         ## Where Sources Agree\n- 2–4 bullets.\n\n\
         ## Caveats & Gaps\n- 2–4 bullets highlighting limitations or disagreements.\n\n\
         ## Sources\n- List only the titles of the sources provided (no [S1], [S2] labels).",
        today = today.format("%Y-%m-%d")
    )
}

/// One block per source: `[label] title — url`, a blank line, then the text.
pub fn format_sources(sources: &[SourceDraft]) -> String {
    sources
        .iter()
        .map(|s| {
            let title = s.title.as_deref().unwrap_or(UNTITLED);
            let body = if s.text.is_empty() { NO_TEXT } else { &s.text };
            format!("[{}] {} — {}\n\n{}", s.label, title, s.url, body)
        })
        .collect::<Vec<_>>()
        .join(SOURCE_SEPARATOR)
}

pub fn build_user_message(query: &str, sources: &[SourceDraft], today: NaiveDate) -> String {
    format!(
        "QUERY:\n{query}\n\nSOURCES:\n{}\n\nINSTRUCTIONS:\n{}",
        format_sources(sources),
        report_template(today)
    )
}
