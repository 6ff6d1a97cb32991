//! Single-page HTML rendering.
//!
//! A request moves through `Idle → FileUploaded → TextExtracted → {Empty | HasText} →
//! Summarizing → {SummaryShown | ErrorShown}`. Only the states a user can look at are modelled
//! by [`PageView`]; the transient ones live inside a request handler, and `Summarizing` is the
//! client-side busy indicator shown while the trigger request is in flight.

use crate::config::PageLabels;
use crate::processing::{ExtractedText, PipelineError};
use minijinja::{Environment, context};
use serde::Serialize;
use thiserror::Error;

const TEMPLATE_NAME: &str = "index.html";
const TEMPLATE: &str = include_str!("../templates/index.html");

/// Prompt shown before anything has been uploaded.
pub const INFO_NOTICE: &str = "Please upload a PDF file to begin.";
/// Notice shown when the PDF has no extractable text.
pub const EMPTY_NOTICE: &str =
    "No text found in the PDF. Ensure it's not a scanned image-based PDF.";
/// Prefix of the generic failure notice.
pub const ERROR_PREFIX: &str = "An error occurred while processing the PDF";

/// Errors raised while rendering the page.
#[derive(Debug, Error)]
pub enum PresenterError {
    /// Template failed to compile or render.
    #[error("failed to render page: {0}")]
    Template(#[from] minijinja::Error),
}

/// What the page currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PageView {
    /// Nothing uploaded yet.
    Idle,
    /// Text was extracted and can be summarized.
    HasText {
        /// Name of the uploaded file, when known.
        file_name: Option<String>,
        /// Extracted document text.
        text: String,
    },
    /// The PDF parsed but carried no text.
    Empty {
        /// Name of the uploaded file, when known.
        file_name: Option<String>,
    },
    /// Summarization finished.
    SummaryShown {
        /// Name of the uploaded file, when known.
        file_name: Option<String>,
        /// Extracted document text.
        text: String,
        /// Final summary.
        summary: String,
    },
    /// A step failed; no partial summary is shown.
    ErrorShown {
        /// Name of the uploaded file, when known.
        file_name: Option<String>,
        /// Extracted text, if extraction got that far.
        text: Option<String>,
        /// Error text appended to the generic notice.
        message: String,
    },
}

impl PageView {
    /// View after a successful extraction.
    pub fn extracted(file_name: Option<String>, extracted: ExtractedText) -> Self {
        if extracted.is_blank() {
            Self::Empty { file_name }
        } else {
            Self::HasText {
                file_name,
                text: extracted.text,
            }
        }
    }

    /// View after a failed step. Blank text maps to the "no text found" notice.
    pub fn failed(file_name: Option<String>, text: Option<String>, error: &PipelineError) -> Self {
        match error {
            PipelineError::EmptyText => Self::Empty { file_name },
            other => Self::ErrorShown {
                file_name,
                text,
                message: other.to_string(),
            },
        }
    }
}

/// Renders [`PageView`]s with the configured labels.
pub struct Presenter {
    env: Environment<'static>,
    labels: PageLabels,
}

impl Presenter {
    /// Compile the page template.
    pub fn new(labels: PageLabels) -> Result<Self, PresenterError> {
        let mut env = Environment::new();
        // The `.html` suffix turns on HTML auto-escaping for extracted text and summaries.
        env.add_template(TEMPLATE_NAME, TEMPLATE)?;
        Ok(Self { env, labels })
    }

    /// Render the full page for `view`.
    pub fn render(&self, view: &PageView) -> Result<String, PresenterError> {
        let template = self.env.get_template(TEMPLATE_NAME)?;
        let html = template.render(context! {
            labels => &self.labels,
            view => view,
            info_notice => INFO_NOTICE,
            empty_notice => EMPTY_NOTICE,
            error_prefix => ERROR_PREFIX,
        })?;
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarization::SummarizationClientError;

    fn presenter() -> Presenter {
        Presenter::new(PageLabels::default()).expect("template compiles")
    }

    #[test]
    fn idle_page_prompts_for_upload() {
        let html = presenter().render(&PageView::Idle).expect("render");
        assert!(html.contains("<title>PDF Summary Generator</title>"));
        assert!(html.contains(INFO_NOTICE));
        assert!(!html.contains("Extracted Text"));
    }

    #[test]
    fn extracted_text_is_escaped_and_offers_trigger() {
        let view = PageView::extracted(
            Some("report.pdf".into()),
            ExtractedText {
                text: "Tom & <Jerry>\n".into(),
                pages: 1,
                pages_with_text: 1,
            },
        );
        let html = presenter().render(&view).expect("render");
        assert!(html.contains("readonly>\nTom &amp; &lt;Jerry&gt;\n</textarea>"));
        assert!(html.contains(">Summarize</button>"));
        assert!(html.contains("Summarizing..."));
        assert!(html.contains("report.pdf"));
        assert!(!html.contains(INFO_NOTICE));
    }

    #[test]
    fn blank_extraction_shows_no_text_notice() {
        let view = PageView::extracted(None, ExtractedText::default());
        assert_eq!(view, PageView::Empty { file_name: None });
        let html = presenter().render(&view).expect("render");
        assert!(html.contains(
            "No text found in the PDF. Ensure it&#x27;s not a scanned image-based PDF."
        ));
        assert!(!html.contains("Summarized Text"));
    }

    #[test]
    fn summary_view_shows_success_and_summary() {
        let view = PageView::SummaryShown {
            file_name: None,
            text: "Body\n".into(),
            summary: "Short version".into(),
        };
        let html = presenter().render(&view).expect("render");
        assert!(html.contains("Summary complete!"));
        assert!(html.contains("Short version"));
    }

    #[test]
    fn failures_render_generic_notice_with_error_text() {
        let error = PipelineError::Summarization {
            chunk: 2,
            total: 3,
            source: SummarizationClientError::GenerationFailed("boom".into()),
        };
        let view = PageView::failed(None, Some("Body\n".into()), &error);
        let html = presenter().render(&view).expect("render");
        assert!(html.contains(
            "An error occurred while processing the PDF: Failed to summarize chunk 2 of 3"
        ));
        assert!(html.contains("boom"));
        assert!(!html.contains("Summary complete!"));
    }

    #[test]
    fn empty_text_error_maps_to_empty_view() {
        let view = PageView::failed(Some("scan.pdf".into()), None, &PipelineError::EmptyText);
        assert_eq!(
            view,
            PageView::Empty {
                file_name: Some("scan.pdf".into())
            }
        );
    }

    #[test]
    fn custom_labels_are_rendered() {
        let labels = PageLabels {
            title: "Health Summary Generator Report".into(),
            trigger: "Report".into(),
            ..PageLabels::default()
        };
        let presenter = Presenter::new(labels).expect("template");
        let html = presenter
            .render(&PageView::HasText {
                file_name: None,
                text: "x".into(),
            })
            .expect("render");
        assert!(html.contains("Health Summary Generator Report"));
        assert!(html.contains(">Report</button>"));
    }
}
