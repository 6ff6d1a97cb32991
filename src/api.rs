//! HTTP surface for the PDF summarizer.
//!
//! The browser flow mirrors the single-page UI:
//!
//! - `GET /` – Upload form with an informational prompt.
//! - `POST /upload` – Multipart `file` field; extracts the PDF text and renders it with a
//!   trigger button, or renders the "no text found" notice.
//! - `POST /summarize` – Form posted by the trigger button; renders the summary or an error
//!   notice.
//!
//! The same pipeline is available as JSON for scripts and tools:
//!
//! - `POST /api/extract` – Multipart `file`; returns the extracted text and page counters.
//! - `POST /api/summarize` – `{ "text": ... }`; returns the summary and chunk count.
//! - `POST /api/summarize-pdf` – Multipart `file`; extraction and summarization in one call.
//! - `GET /metrics` – Pipeline counters.
//! - `GET /commands` – Machine-readable command catalog.

use crate::extraction::normalize_line_breaks;
use crate::metrics::MetricsSnapshot;
use crate::presenter::{PageView, Presenter, PresenterError};
use crate::processing::{PipelineError, SummaryApi};
use axum::{
    Form, Json, Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartError},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Shared handler state: the pipeline and the page renderer.
pub struct AppState<S> {
    service: Arc<S>,
    presenter: Arc<Presenter>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            presenter: Arc::clone(&self.presenter),
        }
    }
}

/// Build the HTTP router exposing the UI and JSON API.
///
/// Upload size is not limited here; put a limit on the reverse proxy if one is needed.
pub fn create_router<S>(service: Arc<S>, presenter: Arc<Presenter>) -> Router
where
    S: SummaryApi + 'static,
{
    Router::new()
        .route("/", get(index_page::<S>))
        .route("/upload", post(upload_page::<S>))
        .route("/summarize", post(summarize_page::<S>))
        .route("/api/extract", post(extract_document::<S>))
        .route("/api/summarize", post(summarize_document::<S>))
        .route("/api/summarize-pdf", post(summarize_pdf::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .layer(DefaultBodyLimit::disable())
        .with_state(AppState { service, presenter })
}

/// PDF bytes received from a multipart form.
struct PdfUpload {
    file_name: Option<String>,
    bytes: Vec<u8>,
}

/// Pull the `file` field out of a multipart body.
///
/// Returns `Ok(None)` when no file was submitted (including an empty file input), and
/// [`PipelineError::InvalidUpload`] when the file is not a PDF.
async fn read_pdf_upload(multipart: &mut Multipart) -> Result<Option<PdfUpload>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.is_empty());
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;
        if file_name.is_none() && bytes.is_empty() {
            return Ok(None);
        }
        if !is_pdf(content_type.as_deref(), file_name.as_deref()) {
            return Err(PipelineError::InvalidUpload(format!(
                "expected a PDF file, got {}",
                content_type.as_deref().unwrap_or("unknown content type")
            ))
            .into());
        }
        return Ok(Some(PdfUpload {
            file_name,
            bytes: bytes.to_vec(),
        }));
    }
    Ok(None)
}

fn is_pdf(content_type: Option<&str>, file_name: Option<&str>) -> bool {
    let by_type = content_type
        .map(|value| value.eq_ignore_ascii_case("application/pdf"))
        .unwrap_or(false);
    let by_name = file_name
        .map(|name| name.to_ascii_lowercase().ends_with(".pdf"))
        .unwrap_or(false);
    by_type || by_name
}

async fn index_page<S>(State(state): State<AppState<S>>) -> Result<Html<String>, AppError>
where
    S: SummaryApi,
{
    Ok(Html(state.presenter.render(&PageView::Idle)?))
}

/// Extract the uploaded PDF and show its text (or the "no text found" notice).
async fn upload_page<S>(
    State(state): State<AppState<S>>,
    mut multipart: Multipart,
) -> Result<Html<String>, AppError>
where
    S: SummaryApi,
{
    let view = match read_pdf_upload(&mut multipart).await {
        Ok(None) => PageView::Idle,
        Ok(Some(PdfUpload { file_name, bytes })) => {
            tracing::info!(file = ?file_name, bytes = bytes.len(), "PDF uploaded");
            match state.service.extract_text(bytes).await {
                Ok(extracted) => PageView::extracted(file_name, extracted),
                Err(error) => PageView::failed(file_name, None, &error),
            }
        }
        Err(AppError::Pipeline(error)) => PageView::failed(None, None, &error),
        Err(other) => return Err(other),
    };
    Ok(Html(state.presenter.render(&view)?))
}

/// Form posted by the trigger button.
#[derive(Deserialize)]
struct SummarizeForm {
    /// Extracted text echoed back from the read-only text area.
    #[serde(default)]
    text: String,
    /// Name of the uploaded file, for display only.
    #[serde(default)]
    file_name: Option<String>,
}

/// Summarize the extracted text and show the result.
///
/// The text area comes back with CRLF line breaks, which are folded back to `\n` so the chunks
/// match the extracted text.
async fn summarize_page<S>(
    State(state): State<AppState<S>>,
    Form(form): Form<SummarizeForm>,
) -> Result<Html<String>, AppError>
where
    S: SummaryApi,
{
    let SummarizeForm { text, file_name } = form;
    let text = normalize_line_breaks(&text);
    let view = match state.service.summarize_text(&text).await {
        Ok(outcome) => {
            tracing::info!(chunks = outcome.chunk_count, "Summary rendered");
            PageView::SummaryShown {
                file_name,
                text,
                summary: outcome.summary,
            }
        }
        Err(error) => PageView::failed(file_name, Some(text), &error),
    };
    Ok(Html(state.presenter.render(&view)?))
}

/// Response body for `POST /api/extract`.
#[derive(Serialize)]
struct ExtractResponse {
    text: String,
    pages: usize,
    pages_with_text: usize,
    empty: bool,
}

async fn extract_document<S>(
    State(state): State<AppState<S>>,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError>
where
    S: SummaryApi,
{
    let upload = read_pdf_upload(&mut multipart)
        .await?
        .ok_or(AppError::MissingFile)?;
    let extracted = state.service.extract_text(upload.bytes).await?;
    Ok(Json(ExtractResponse {
        empty: extracted.is_blank(),
        text: extracted.text,
        pages: extracted.pages,
        pages_with_text: extracted.pages_with_text,
    }))
}

/// Request body for `POST /api/summarize`.
#[derive(Deserialize)]
struct SummarizeRequest {
    text: String,
}

/// Response body for `POST /api/summarize`.
#[derive(Serialize)]
struct SummarizeResponse {
    summary: String,
    chunks: usize,
}

async fn summarize_document<S>(
    State(state): State<AppState<S>>,
    Json(request): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, AppError>
where
    S: SummaryApi,
{
    let outcome = state.service.summarize_text(&request.text).await?;
    Ok(Json(SummarizeResponse {
        summary: outcome.summary,
        chunks: outcome.chunk_count,
    }))
}

/// Response body for `POST /api/summarize-pdf`.
#[derive(Serialize)]
struct SummarizePdfResponse {
    text: String,
    summary: String,
    chunks: usize,
}

async fn summarize_pdf<S>(
    State(state): State<AppState<S>>,
    mut multipart: Multipart,
) -> Result<Json<SummarizePdfResponse>, AppError>
where
    S: SummaryApi,
{
    let upload = read_pdf_upload(&mut multipart)
        .await?
        .ok_or(AppError::MissingFile)?;
    let extracted = state.service.extract_text(upload.bytes).await?;
    if extracted.is_blank() {
        return Err(PipelineError::EmptyText.into());
    }
    let outcome = state.service.summarize_text(&extracted.text).await?;
    Ok(Json(SummarizePdfResponse {
        text: extracted.text,
        summary: outcome.summary,
        chunks: outcome.chunk_count,
    }))
}

async fn get_metrics<S>(State(state): State<AppState<S>>) -> Json<MetricsSnapshot>
where
    S: SummaryApi,
{
    Json(state.service.metrics_snapshot())
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery by scripts and tools.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "extract",
                method: "POST",
                path: "/api/extract",
                description: "Extract the text of an uploaded PDF (multipart field `file`). Response returns { \"text\", \"pages\", \"pages_with_text\", \"empty\" }.",
                request_example: None,
            },
            CommandDescriptor {
                name: "summarize",
                method: "POST",
                path: "/api/summarize",
                description: "Summarize text in 1024-character chunks. Response returns { \"summary\": string, \"chunks\": number }.",
                request_example: Some(json!({ "text": "Document contents" })),
            },
            CommandDescriptor {
                name: "summarize_pdf",
                method: "POST",
                path: "/api/summarize-pdf",
                description: "Extract and summarize an uploaded PDF (multipart field `file`) in one call.",
                request_example: None,
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return pipeline counters useful for observability dashboards.",
                request_example: None,
            },
        ],
    })
}

enum AppError {
    Pipeline(PipelineError),
    Render(PresenterError),
    Multipart(MultipartError),
    MissingFile,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Pipeline(error) => {
                let status = match &error {
                    PipelineError::InvalidUpload(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    PipelineError::Extraction(_) | PipelineError::EmptyText => {
                        StatusCode::UNPROCESSABLE_ENTITY
                    }
                    PipelineError::Chunking(_) => StatusCode::INTERNAL_SERVER_ERROR,
                    PipelineError::Summarization { .. } => StatusCode::BAD_GATEWAY,
                };
                (status, error.to_string())
            }
            Self::Render(error) => {
                tracing::error!(error = %error, "Page rendering failed");
                (StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
            }
            Self::Multipart(error) => {
                (StatusCode::BAD_REQUEST, format!("Multipart error: {error}"))
            }
            Self::MissingFile => (
                StatusCode::BAD_REQUEST,
                "No file provided in multipart field `file`".to_string(),
            ),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<PipelineError> for AppError {
    fn from(inner: PipelineError) -> Self {
        Self::Pipeline(inner)
    }
}

impl From<PresenterError> for AppError {
    fn from(inner: PresenterError) -> Self {
        Self::Render(inner)
    }
}

impl From<MultipartError> for AppError {
    fn from(inner: MultipartError) -> Self {
        Self::Multipart(inner)
    }
}
