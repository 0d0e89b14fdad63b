use regex::{Captures, Regex};
use std::collections::HashSet;
use std::sync::LazyLock;

static CITATION_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[(S\d+)\]").unwrap());

/// Rewrite `[S<n>]` markers into in-page anchor links.
///
/// Only labels in `labels` are touched; anything else in brackets is left
/// alone. All labels are handled in one pass, so `[S1]` never matches inside
/// `[S10]`.
pub fn linkify_citations<'a>(markdown: &str, labels: impl IntoIterator<Item = &'a str>) -> String {
    let known: HashSet<&str> = labels.into_iter().collect();
    if known.is_empty() {
        return markdown.to_string();
    }

    CITATION_REGEX
        .replace_all(markdown, |caps: &Captures| {
            let label = &caps[1];
            if known.contains(label) {
                format!(r##"<a href="#{label}">[{label}]</a>"##)
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}
