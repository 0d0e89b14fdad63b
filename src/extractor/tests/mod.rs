use bytes::Bytes;
use std::fs;
use url::Url;

use crate::entities::SourceStatus;
use crate::extractor::pdf::fixtures::{build_pdf, text_page, unknown_font_page};
use crate::extractor::{Diagnostic, TRUNCATION_MARKER, extract_response};
use crate::fetcher::pipeline::process_response;
use crate::fetcher::types::PageResponse;

#[tokio::test]
async fn test_extract_article() {
    let html = fs::read("src/extractor/tests/fixtures/article.html")
        .expect("Failed to read test fixture");

    let response = create_test_response(html, "https://example.com/heat-pumps", "text/html");
    let extraction = extract_response(&response, 15_000).await;

    assert_eq!(extraction.diagnostic, None);
    assert_eq!(extraction.status(), SourceStatus::Ok);
    assert!(extraction.text.contains("coefficient of performance"));
    assert!(extraction.text.contains("payback periods"));
    assert!(!extraction.text.contains("dataLayer"));
    assert!(!extraction.text.contains("font-family"));
    assert!(!extraction.text.contains("mine works fine"));
    assert!(!extraction.text.contains('\n'));
}

#[tokio::test]
async fn test_empty_page_is_skipped() {
    let html =
        fs::read("src/extractor/tests/fixtures/empty.html").expect("Failed to read test fixture");

    let response = create_test_response(html, "https://example.com/app", "text/html");
    let extraction = extract_response(&response, 15_000).await;

    assert_eq!(extraction.text, "");
    assert_eq!(extraction.diagnostic, Some(Diagnostic::Empty));
    assert_eq!(extraction.note().as_deref(), Some("empty"));
    assert_eq!(extraction.status(), SourceStatus::Skipped);
}

#[tokio::test]
async fn test_latin1_page_is_decoded() {
    let html =
        fs::read("src/extractor/tests/fixtures/latin1.html").expect("Failed to read test fixture");

    let response = create_test_response(html, "https://example.fr/cafe", "text/html");
    let extraction = extract_response(&response, 15_000).await;

    assert!(extraction.text.contains("café au lait"));
}

#[tokio::test]
async fn test_long_page_is_truncated() {
    let html = format!(
        "<html><head><title>Long</title></head><body><article><p>{}</p></article></body></html>",
        "word ".repeat(5_000)
    );

    let response = create_test_response(html.into_bytes(), "https://example.com/long", "text/html");
    let extraction = extract_response(&response, 1_000).await;

    assert!(extraction.diagnostic.is_none());
    assert!(extraction.text.ends_with(TRUNCATION_MARKER));
    let body = extraction.text.strip_suffix(TRUNCATION_MARKER).unwrap();
    assert_eq!(body.chars().count(), 1_000);
}

#[tokio::test]
async fn test_broken_pdf_is_an_error() {
    let response = create_test_response(
        b"%PDF-1.7 truncated".to_vec(),
        "https://example.com/report.pdf",
        "application/pdf",
    );
    let extraction = extract_response(&response, 15_000).await;

    assert_eq!(extraction.text, "");
    assert_eq!(extraction.status(), SourceStatus::Error);
    assert!(extraction.note().unwrap().starts_with("error: "));
}

#[tokio::test]
async fn test_pdf_pages_are_extracted() {
    let pdf = build_pdf(&[text_page("Alpha page one"), text_page("Beta page two")]);

    let response = create_test_response(pdf, "https://example.com/report", "application/pdf");
    let extraction = extract_response(&response, 15_000).await;

    assert_eq!(extraction.diagnostic, None);
    assert_eq!(extraction.status(), SourceStatus::Ok);
    assert!(extraction.text.contains("Alpha"));
    assert!(extraction.text.contains("Beta"));
    assert!(!extraction.text.contains('\n'));
}

#[tokio::test]
async fn test_long_pdf_stops_at_page_limit() {
    let contents: Vec<String> = (1..=25)
        .map(|n| text_page(&format!("Section{n:02}")))
        .collect();

    let response =
        create_test_response(build_pdf(&contents), "https://example.com/annual.pdf", "");
    let extraction = extract_response(&response, 15_000).await;

    assert_eq!(extraction.status(), SourceStatus::Ok);
    assert!(extraction.text.contains("Section20"));
    assert!(!extraction.text.contains("Section21"));
}

#[tokio::test]
async fn test_unreadable_pdf_page_is_skipped() {
    let pdf = build_pdf(&[
        text_page("Alpha page one"),
        unknown_font_page("Beta page two"),
        text_page("Gamma page three"),
    ]);

    let response = create_test_response(pdf, "https://example.com/mixed.pdf", "application/pdf");
    let extraction = extract_response(&response, 15_000).await;

    assert_eq!(extraction.status(), SourceStatus::Ok);
    assert!(extraction.text.contains("Alpha"));
    assert!(extraction.text.contains("Gamma"));
}

#[tokio::test]
async fn test_malformed_html() {
    let html = b"<html><head><title>Broken</title><body><p>Unclosed tags<div>More content".to_vec();

    let response = create_test_response(html, "https://example.com/broken", "text/html");
    let extraction = extract_response(&response, 15_000).await;

    // Should handle malformed HTML gracefully
    if extraction.diagnostic.is_none() {
        assert!(
            extraction.text.contains("Unclosed tags") || extraction.text.contains("More content")
        );
    }
}

fn create_test_response(body: Vec<u8>, url: &str, content_type: &str) -> PageResponse {
    process_response(
        url,
        Url::parse(url).unwrap(),
        Bytes::from(body),
        content_type,
    )
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use crate::extractor::finalize;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_extract_never_panics(
            html in ".*",
            url in "https://[a-z]+\\.com/[a-z]*"
        ) {
            let response = create_test_response(html.into_bytes(), &url, "text/html");
            let rt = tokio::runtime::Runtime::new().unwrap();
            let _ = rt.block_on(extract_response(&response, 15_000));
        }

        #[test]
        fn test_finalize_output_is_normalized_and_bounded(
            raw in "\\PC{0,400}",
            cap in 1usize..200,
        ) {
            let extraction = finalize(&raw, cap);
            match extraction.diagnostic {
                Some(Diagnostic::Empty) => prop_assert!(extraction.text.is_empty()),
                None => {
                    let body = extraction.text.strip_suffix(TRUNCATION_MARKER).unwrap_or(&extraction.text);
                    prop_assert!(body.chars().count() <= cap);
                    prop_assert!(!body.contains("  "));
                    prop_assert!(!body.starts_with(char::is_whitespace));
                }
                Some(other) => prop_assert!(false, "unexpected diagnostic {other:?}"),
            }
        }
    }
}
