#![deny(missing_docs)]

//! Core library for the PDF summarizer: extract a PDF's text, summarize it chunk by chunk, and
//! serve the result through a small web UI.

/// HTTP routing, HTML pages, and JSON handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// PDF text extraction.
pub mod extraction;
/// Structured logging and tracing setup.
pub mod logging;
/// Pipeline metrics helpers.
pub mod metrics;
/// Page rendering for the web UI.
pub mod presenter;
/// Summarization pipeline utilities.
pub mod processing;
/// Summarization provider clients.
pub mod summarization;
