use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing pipeline activity since startup.
#[derive(Default)]
pub struct PipelineMetrics {
    documents_extracted: AtomicU64,
    empty_documents: AtomicU64,
    summaries_generated: AtomicU64,
    chunks_summarized: AtomicU64,
    failures: AtomicU64,
}

impl PipelineMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a parsed document; `empty` marks documents without extractable text.
    pub fn record_extraction(&self, empty: bool) {
        self.documents_extracted.fetch_add(1, Ordering::Relaxed);
        if empty {
            self.empty_documents.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a completed summary and the number of chunks it was built from.
    pub fn record_summary(&self, chunk_count: u64) {
        self.summaries_generated.fetch_add(1, Ordering::Relaxed);
        self.chunks_summarized.fetch_add(chunk_count, Ordering::Relaxed);
    }

    /// Record an extraction or summarization failure.
    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_extracted: self.documents_extracted.load(Ordering::Relaxed),
            empty_documents: self.empty_documents.load(Ordering::Relaxed),
            summaries_generated: self.summaries_generated.load(Ordering::Relaxed),
            chunks_summarized: self.chunks_summarized.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of pipeline counters used for reporting.
#[derive(Debug, Clone, Copy, Default, serde::Serialize)]
pub struct MetricsSnapshot {
    /// PDFs parsed successfully.
    pub documents_extracted: u64,
    /// Parsed PDFs that yielded no text at all.
    pub empty_documents: u64,
    /// Summaries returned to callers.
    pub summaries_generated: u64,
    /// Chunks sent to the summarizer across all completed summaries.
    pub chunks_summarized: u64,
    /// Requests that ended in an extraction or summarization error.
    pub failures: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_extractions_and_summaries() {
        let metrics = PipelineMetrics::new();
        metrics.record_extraction(false);
        metrics.record_extraction(true);
        metrics.record_summary(2);
        metrics.record_summary(3);
        metrics.record_failure();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.documents_extracted, 2);
        assert_eq!(snapshot.empty_documents, 1);
        assert_eq!(snapshot.summaries_generated, 2);
        assert_eq!(snapshot.chunks_summarized, 5);
        assert_eq!(snapshot.failures, 1);
    }

    #[test]
    fn snapshot_starts_at_zero() {
        let snapshot = PipelineMetrics::new().snapshot();
        assert_eq!(snapshot.documents_extracted, 0);
        assert_eq!(snapshot.chunks_summarized, 0);
        assert_eq!(snapshot.failures, 0);
    }
}
