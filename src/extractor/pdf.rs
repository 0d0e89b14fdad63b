use bytes::Bytes;
use pdf_extract::{Document, OutputError, PlainTextOutput};
use std::panic::{AssertUnwindSafe, catch_unwind};
use thiserror::Error;
use tracing::debug;

/// Only the leading pages are read; long reports would blow the text cap anyway.
pub const MAX_PDF_PAGES: usize = 20;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("{0}")]
    Parse(#[from] OutputError),

    #[error("pdf parser panicked")]
    Panicked,
}

/// Text of the first [`MAX_PDF_PAGES`] pages, separated by blank lines.
///
/// Only a document that cannot be loaded is an error. A page that fails to
/// render, or makes the renderer panic, contributes an empty string.
pub fn pdf_to_text(bytes: &[u8]) -> Result<String, PdfError> {
    let mut doc = Document::load_mem(bytes).map_err(OutputError::from)?;
    if doc.is_encrypted() {
        doc.decrypt("").map_err(OutputError::from)?;
    }

    let pages: Vec<String> = doc
        .get_pages()
        .into_keys()
        .take(MAX_PDF_PAGES)
        .map(|page_num| render_page(&doc, page_num))
        .collect();

    Ok(join_pages(pages))
}

fn render_page(doc: &Document, page_num: u32) -> String {
    let rendered = catch_unwind(AssertUnwindSafe(|| {
        let mut text = String::new();
        let result = {
            let mut output = PlainTextOutput::new(&mut text);
            pdf_extract::output_doc_page(doc, &mut output, page_num)
        };
        result.map(|()| text)
    }));

    match rendered {
        Ok(Ok(text)) => text,
        Ok(Err(err)) => {
            debug!(page = page_num, error = %err, "unreadable pdf page");
            String::new()
        }
        Err(_) => {
            debug!(page = page_num, "pdf page panicked the renderer");
            String::new()
        }
    }
}

/// Runs the parser on the blocking pool.
pub async fn extract_pdf(bytes: Bytes) -> Result<String, PdfError> {
    tokio::task::spawn_blocking(move || pdf_to_text(&bytes))
        .await
        .map_err(|_| PdfError::Panicked)?
}

fn join_pages(pages: Vec<String>) -> String {
    pages.join("\n\n").trim().to_string()
}
