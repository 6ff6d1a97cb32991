//! Summarization pipeline: extraction, chunking, and per-chunk summarization.

pub mod chunking;
mod service;
pub mod types;

pub use service::{SummaryApi, SummaryPipeline};
pub use types::{ChunkingError, ExtractedText, PipelineError, SummaryOutcome};
