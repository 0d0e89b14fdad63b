use readability::extractor;
use scraper::{ElementRef, Html, Selector, node::Element};
use url::Url;

use crate::extractor::model::normalize_whitespace;

/// Elements whose text is never article content.
const SKIPPED_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "template", "svg", "iframe", "nav", "header", "footer",
    "aside", "form", "button", "select",
];

/// When readability keeps less than this share of the page text, the fuller
/// body text wins.
const MIN_READABILITY_SHARE: f64 = 0.25;

/// Pull the readable text out of an HTML document.
///
/// Readability does the boilerplate stripping; when it finds nothing, or
/// keeps only a sliver of what the page holds, the body text (minus
/// navigation, scripts and comment threads) is used instead.
pub fn extract(html: &str, url: &Url) -> String {
    let fallback = fallback_text(html);

    let article = extractor::extract(&mut html.as_bytes(), url)
        .map(|product| normalize_whitespace(&product.text))
        .unwrap_or_default();

    let article_len = article.chars().count() as f64;
    let fallback_len = fallback.chars().count() as f64;
    if article.is_empty() || article_len < fallback_len * MIN_READABILITY_SHARE {
        fallback
    } else {
        article
    }
}

fn fallback_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let Ok(body_selector) = Selector::parse("body") else {
        return String::new();
    };

    let root = document
        .select(&body_selector)
        .next()
        .unwrap_or_else(|| document.root_element());

    let mut out = String::new();
    collect_text(root, &mut out);
    normalize_whitespace(&out)
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    if is_boilerplate(element.value()) {
        return;
    }

    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            collect_text(child_element, out);
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        }
    }
}

fn is_boilerplate(element: &Element) -> bool {
    if SKIPPED_ELEMENTS.contains(&element.name()) {
        return true;
    }

    // comment threads: id="comments", class="comment-list", ...
    let is_comment = |s: &str| s.to_ascii_lowercase().contains("comment");
    element.id().is_some_and(is_comment) || element.classes().any(is_comment)
}
