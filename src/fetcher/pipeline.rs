use crate::fetcher::types::{Charset, PageBody, PageResponse};
use bytes::Bytes;
use encoding_rs::Encoding;
use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;
use url::Url;

static CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

static META_HTTP_EQUIV_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+[^>]*?http-equiv\s*=\s*["']?content-type["']?[^>]*?content\s*=\s*["']?[^"'>]*?charset\s*=\s*([^"'\s;/>]+)"#).unwrap()
});

static PDF_URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.pdf(\?.*)?$").unwrap());

pub fn process_response(
    url_requested: &str,
    url_final: Url,
    body_bytes: Bytes,
    content_type: &str,
) -> PageResponse {
    let body = if is_pdf(url_requested, content_type, &body_bytes) {
        PageBody::Pdf
    } else {
        let charset = detect_charset(content_type, &body_bytes);
        let text = decode_to_utf8(&body_bytes, &charset);
        PageBody::Html { text, charset }
    };

    PageResponse {
        url_final,
        body_raw: body_bytes,
        body,
    }
}

/// PDF if the content type says so, the url ends in `.pdf` (query string
/// allowed), or the body carries the PDF magic header.
pub fn is_pdf(url: &str, content_type: &str, body_bytes: &[u8]) -> bool {
    content_type.to_ascii_lowercase().contains("pdf")
        || PDF_URL_REGEX.is_match(url)
        || body_bytes.starts_with(b"%PDF-")
}

fn detect_charset(content_type: &str, body_bytes: &[u8]) -> Charset {
    // 1. Content-Type header
    if let Some(charset) = charset_from_captures(&CHARSET_REGEX, content_type) {
        return charset;
    }

    // 2. <meta> declarations in the first 4KB
    let search_bytes = &body_bytes[..body_bytes.len().min(4096)];
    let search_str = String::from_utf8_lossy(search_bytes);

    if let Some(charset) = charset_from_captures(&META_CHARSET_REGEX, &search_str) {
        return charset;
    }
    if let Some(charset) = charset_from_captures(&META_HTTP_EQUIV_REGEX, &search_str) {
        return charset;
    }

    // 3. Heuristic detection
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(search_bytes, false);
    Charset::from_encoding(detector.guess(None, true))
}

fn charset_from_captures(regex: &Regex, haystack: &str) -> Option<Charset> {
    let name = regex.captures(haystack)?.get(1)?.as_str().to_lowercase();
    Encoding::for_label(name.as_bytes()).map(Charset::from_encoding)
}

/// Lossy decode: undecodable sequences become U+FFFD rather than failing the page.
fn decode_to_utf8(body_bytes: &[u8], charset: &Charset) -> String {
    let encoding = charset.encoding();
    let (decoded, _encoding, had_errors) = encoding.decode(body_bytes);

    if had_errors {
        warn!(
            encoding = encoding.name(),
            "body contained malformed sequences; replaced"
        );
    }

    decoded.into_owned()
}
