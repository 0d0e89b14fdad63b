//! Server-rendered HTML pages.

use ammonia::clean_text;

use crate::agent::ReportKind;
use crate::entities::{Report, Source, SourceStatus, source_label};
use crate::web::flash::Flash;

const STYLE: &str = "body{font-family:system-ui,sans-serif;max-width:52rem;margin:2rem auto;padding:0 1rem;line-height:1.5}\
.flash,.banner{padding:.6rem 1rem;border-radius:4px;margin:1rem 0}\
.success{background:#e6f4ea}.error,.banner{background:#fdecea}\
.status{font-size:.8rem;padding:0 .4rem;border-radius:3px;background:#eee}\
.status-ok{background:#e6f4ea}.status-blocked,.status-error{background:#fdecea}\
form input[type=text]{width:70%}";

fn layout(title: &str, flash: Option<&Flash>, body: &str) -> String {
    let flash_html = flash
        .map(|f| {
            format!(
                r#"<div class="flash {}">{}</div>"#,
                f.level.as_str(),
                clean_text(&f.message)
            )
        })
        .unwrap_or_default();

    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <header><a href=\"/\">dossier</a></header>\n{flash_html}\n{body}\n</body>\n</html>\n",
        title = clean_text(title),
    )
}

pub fn index(reports: &[Report], flash: Option<&Flash>) -> String {
    let mut body = String::from(
        r#"<h1>Research reports</h1>
<form method="post" action="/run">
<input type="text" name="query" placeholder="What should I research?" autofocus>
<button type="submit">Run</button>
</form>
"#,
    );

    if reports.is_empty() {
        body.push_str("<p>No reports yet.</p>");
    } else {
        body.push_str("<ul class=\"reports\">\n");
        for report in reports {
            body.push_str(&format!(
                "<li><a href=\"/report/{id}\">{query}</a> <small>{created}</small></li>\n",
                id = report.id,
                query = clean_text(&report.query),
                created = report.created_at.format("%Y-%m-%d %H:%M UTC"),
            ));
        }
        body.push_str("</ul>");
    }

    layout("Research reports", flash, &body)
}

/// `summary_html` must already be sanitized.
pub fn report(
    report: &Report,
    sources: &[Source],
    summary_html: &str,
    flash: Option<&Flash>,
) -> String {
    let mut body = String::new();

    match ReportKind::from_summary(&report.summary_md) {
        ReportKind::SearchFailed => body.push_str(
            "<div class=\"banner\">The web search failed, so this report has no sources.</div>\n",
        ),
        ReportKind::SummarizeFailed => body.push_str(
            "<div class=\"banner\">Summarization failed. The sources below were still collected.</div>\n",
        ),
        ReportKind::Completed => {}
    }

    body.push_str(&format!(
        "<p class=\"meta\"><strong>Query:</strong> {query} <small>{created}</small></p>\n\
         <article>\n{summary_html}\n</article>\n",
        query = clean_text(&report.query),
        created = report.created_at.format("%Y-%m-%d %H:%M UTC"),
    ));

    if !sources.is_empty() {
        body.push_str("<h2>Sources</h2>\n<ol class=\"sources\">\n");
        for (index, source) in sources.iter().enumerate() {
            body.push_str(&source_item(&source_label(index + 1), source));
        }
        body.push_str("</ol>");
    }

    layout(&report.query, flash, &body)
}

fn source_item(label: &str, source: &Source) -> String {
    let title = source.title.as_deref().unwrap_or(&source.url);
    let note = match (&source.status, source.note.as_deref()) {
        (SourceStatus::Ok, _) | (_, None) => String::new(),
        (_, Some(note)) => format!(" <small>{}</small>", clean_text(note)),
    };

    format!(
        "<li id=\"{label}\">[{label}] <a href=\"{url}\" rel=\"noopener noreferrer\">{title}</a> \
         <span class=\"status status-{status}\">{status}</span>{note}</li>\n",
        url = clean_text(&source.url),
        title = clean_text(title),
        status = source.status.as_str(),
    )
}
