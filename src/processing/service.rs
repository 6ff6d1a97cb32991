//! Pipeline service coordinating extraction, chunking, and summarization.

use crate::{
    extraction::{ExtractionError, PdfTextExtractor, assemble_full_text},
    metrics::{MetricsSnapshot, PipelineMetrics},
    processing::{
        chunking::{CHUNK_SIZE, chunk_text},
        types::{ExtractedText, PipelineError, SummaryOutcome},
    },
    summarization::{GenerationParams, SummarizationClient, SummarizationRequest},
};
use async_trait::async_trait;
use std::sync::Arc;

/// Runs one document through extraction and summarization.
///
/// The service owns long-lived handles to the extractor, the summarization client, and the metrics
/// registry so that the HTML pages, the JSON API, and the CLI reuse the same components.
/// Construct it once near process start and share it through an `Arc`.
pub struct SummaryPipeline {
    extractor: Arc<dyn PdfTextExtractor>,
    summarizer: Arc<dyn SummarizationClient>,
    params: GenerationParams,
    chunk_size: usize,
    metrics: Arc<PipelineMetrics>,
}

/// Abstraction over the pipeline used by external surfaces (HTTP, CLI).
#[async_trait]
pub trait SummaryApi: Send + Sync {
    /// Extract the full text of a PDF.
    async fn extract_text(&self, pdf: Vec<u8>) -> Result<ExtractedText, PipelineError>;

    /// Summarize previously extracted text.
    async fn summarize_text(&self, text: &str) -> Result<SummaryOutcome, PipelineError>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl SummaryPipeline {
    /// Build a pipeline around the given extractor and summarizer handle.
    pub fn new(
        extractor: Arc<dyn PdfTextExtractor>,
        summarizer: Arc<dyn SummarizationClient>,
    ) -> Self {
        Self {
            extractor,
            summarizer,
            params: GenerationParams::default(),
            chunk_size: CHUNK_SIZE,
            metrics: Arc::new(PipelineMetrics::new()),
        }
    }

    /// Open the PDF and join the text of every page that has any.
    ///
    /// Parsing runs on the blocking pool. A document whose pages are all empty is returned as a
    /// blank [`ExtractedText`] rather than an error; callers decide how to report it.
    pub async fn extract_text(&self, pdf: Vec<u8>) -> Result<ExtractedText, PipelineError> {
        let extractor = Arc::clone(&self.extractor);
        let bytes = pdf.len();
        let pages = tokio::task::spawn_blocking(move || extractor.extract_pages(&pdf))
            .await
            .map_err(|error| ExtractionError::Worker(error.to_string()))
            .and_then(|result| result)
            .inspect_err(|error| {
                self.metrics.record_failure();
                tracing::warn!(error = %error, bytes, "PDF extraction failed");
            })?;

        let page_count = pages.len();
        let pages_with_text = pages.iter().filter(|page| page.is_some()).count();
        let extracted = ExtractedText {
            text: assemble_full_text(pages),
            pages: page_count,
            pages_with_text,
        };

        self.metrics.record_extraction(extracted.is_blank());
        tracing::info!(
            bytes,
            pages = page_count,
            pages_with_text,
            characters = extracted.text.chars().count(),
            "Extracted PDF text"
        );
        Ok(extracted)
    }

    /// Summarize text chunk by chunk, in order.
    ///
    /// Blank text is rejected with [`PipelineError::EmptyText`] before the summarizer is called.
    /// The first failing chunk aborts the run and no partial summary is returned.
    pub async fn summarize_text(&self, text: &str) -> Result<SummaryOutcome, PipelineError> {
        if text.trim().is_empty() {
            return Err(PipelineError::EmptyText);
        }

        let chunks = chunk_text(text, self.chunk_size)?;
        let total = chunks.len();
        tracing::info!(chunks = total, chunk_size = self.chunk_size, "Summarizing text");

        let mut summary = String::new();
        for (index, chunk) in chunks.into_iter().enumerate() {
            let fragment = self
                .summarizer
                .generate_summary(SummarizationRequest {
                    text: chunk.to_string(),
                    params: self.params,
                })
                .await
                .map_err(|source| {
                    self.metrics.record_failure();
                    tracing::warn!(
                        chunk = index + 1,
                        total,
                        error = %source,
                        "Chunk summarization failed; discarding summary"
                    );
                    PipelineError::Summarization {
                        chunk: index + 1,
                        total,
                        source,
                    }
                })?;
            tracing::debug!(chunk = index + 1, total, "Chunk summarized");
            summary.push_str(&fragment);
            summary.push(' ');
        }

        self.metrics.record_summary(total as u64);
        Ok(SummaryOutcome {
            summary: summary.trim().to_string(),
            chunk_count: total,
        })
    }

    /// Extract and summarize in one pass.
    pub async fn summarize_pdf(
        &self,
        pdf: Vec<u8>,
    ) -> Result<(ExtractedText, SummaryOutcome), PipelineError> {
        let extracted = self.extract_text(pdf).await?;
        if extracted.is_blank() {
            return Err(PipelineError::EmptyText);
        }
        let outcome = self.summarize_text(&extracted.text).await?;
        Ok((extracted, outcome))
    }

    /// Return the current pipeline metrics snapshot.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[async_trait]
impl SummaryApi for SummaryPipeline {
    async fn extract_text(&self, pdf: Vec<u8>) -> Result<ExtractedText, PipelineError> {
        SummaryPipeline::extract_text(self, pdf).await
    }

    async fn summarize_text(&self, text: &str) -> Result<SummaryOutcome, PipelineError> {
        SummaryPipeline::summarize_text(self, text).await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        SummaryPipeline::metrics_snapshot(self)
    }
}
