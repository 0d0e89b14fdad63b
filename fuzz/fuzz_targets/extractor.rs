#![no_main]

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use url::Url;

use dossier::extractor::{finalize, reader};
use dossier::fetcher::{PageBody, pipeline::process_response};

const MAX_CHARS: usize = 15_000;

fuzz_target!(|data: &[u8]| {
    let url = Url::parse("https://example.com/article").unwrap();

    // charset sniffing and decoding must accept any byte soup
    let response = process_response(
        url.as_str(),
        url.clone(),
        Bytes::copy_from_slice(data),
        "text/html",
    );

    if let PageBody::Html { text, .. } = &response.body {
        let extraction = finalize(&reader::extract(text, &url), MAX_CHARS);
        assert!(extraction.text.is_empty() == extraction.diagnostic.is_some());
    }
});
