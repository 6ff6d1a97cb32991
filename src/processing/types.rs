//! Core data types and error definitions for the summarization pipeline.

use crate::extraction::ExtractionError;
use crate::summarization::SummarizationClientError;
use thiserror::Error;

/// Errors produced while cutting text into chunks.
#[derive(Debug, Error)]
pub enum ChunkingError {
    /// A zero-width window can never cover the text.
    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,
}

/// Errors emitted by the summarization pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The upload was not a PDF.
    #[error("Unsupported upload: {0}")]
    InvalidUpload(String),
    /// The PDF could not be parsed.
    #[error("Failed to extract text: {0}")]
    Extraction(#[from] ExtractionError),
    /// The document contained no extractable text; summarization was not attempted.
    #[error("No text found in the PDF")]
    EmptyText,
    /// Chunking step failed to segment the text.
    #[error("Failed to chunk text: {0}")]
    Chunking(#[from] ChunkingError),
    /// The summarizer failed on one chunk; the whole summary is discarded.
    #[error("Failed to summarize chunk {chunk} of {total}: {source}")]
    Summarization {
        /// One-based index of the failing chunk.
        chunk: usize,
        /// Number of chunks in the document.
        total: usize,
        /// Underlying provider error.
        #[source]
        source: SummarizationClientError,
    },
}

/// Text recovered from an uploaded PDF.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText {
    /// Page texts joined in order, each followed by a newline.
    pub text: String,
    /// Number of pages in the document.
    pub pages: usize,
    /// Number of pages that contributed text.
    pub pages_with_text: usize,
}

impl ExtractedText {
    /// Whether the document yielded no usable text (the "no text found" condition).
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Result of a completed summarization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryOutcome {
    /// Chunk summaries joined by single spaces, trimmed.
    pub summary: String,
    /// Number of chunks sent to the summarizer.
    pub chunk_count: usize,
}
