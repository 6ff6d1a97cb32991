//! PDF text extraction.
//!
//! A document is opened once and every page is asked for its text in page-number order. Pages
//! that yield nothing (image-only scans, blank pages, content the parser cannot decode) are
//! skipped without a placeholder, so the assembled text only carries real content.

use lopdf::Document;
use thiserror::Error;

/// Errors raised while turning PDF bytes into text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The bytes could not be opened as a PDF document.
    #[error("unable to read PDF: {0}")]
    Unreadable(String),
    /// The blocking extraction task panicked or was cancelled.
    #[error("extraction task failed: {0}")]
    Worker(String),
}

/// Interface implemented by PDF text-extraction backends.
pub trait PdfTextExtractor: Send + Sync {
    /// Extract the text of every page in document order.
    ///
    /// Each entry corresponds to one page; `None` means the page had no extractable text.
    fn extract_pages(&self, pdf: &[u8]) -> Result<Vec<Option<String>>, ExtractionError>;
}

/// Extractor backed by `lopdf`'s content-stream text decoder.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfExtractor;

impl LopdfExtractor {
    /// Construct a new extractor.
    pub const fn new() -> Self {
        Self
    }
}

impl PdfTextExtractor for LopdfExtractor {
    fn extract_pages(&self, pdf: &[u8]) -> Result<Vec<Option<String>>, ExtractionError> {
        let document = Document::load_mem(pdf)
            .map_err(|error| ExtractionError::Unreadable(error.to_string()))?;

        // `get_pages` is keyed by page number, so iteration follows document order.
        let pages = document
            .get_pages()
            .into_keys()
            .map(|page_number| match document.extract_text(&[page_number]) {
                Ok(text) => normalize_page_text(&text),
                Err(error) => {
                    tracing::warn!(
                        page = page_number,
                        error = %error,
                        "Page text could not be decoded; skipping"
                    );
                    None
                }
            })
            .collect::<Vec<_>>();

        tracing::debug!(pages = pages.len(), "Extracted page texts");
        Ok(pages)
    }
}

/// Drop the trailing line breaks the decoder emits after each text object.
fn normalize_page_text(raw: &str) -> Option<String> {
    let text = normalize_line_breaks(raw);
    let trimmed = text.trim_end();
    if trimmed.trim_start().is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Rewrite `\r\n` and lone `\r` as `\n`.
///
/// Browsers submit text area contents with CRLF line breaks, so extracted text only survives a
/// form round trip unchanged when it never carries a carriage return.
pub fn normalize_line_breaks(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Join page texts into the full document text.
///
/// Every non-empty page contributes its text followed by `\n`; empty pages contribute nothing.
pub fn assemble_full_text<I>(pages: I) -> String
where
    I: IntoIterator<Item = Option<String>>,
{
    let mut full_text = String::new();
    for text in pages.into_iter().flatten() {
        if text.is_empty() {
            continue;
        }
        full_text.push_str(&text);
        full_text.push('\n');
    }
    full_text
}
