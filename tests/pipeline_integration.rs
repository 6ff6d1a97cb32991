use std::{collections::HashMap, sync::Arc};

use httpmock::{Method::POST, MockServer};
use lopdf::{
    Document, Object, Stream,
    content::{Content, Operation},
    dictionary,
};
use pdf_summarizer::{
    config::Config,
    extraction::{LopdfExtractor, PdfTextExtractor},
    processing::{PipelineError, SummaryPipeline},
    summarization::get_summarization_client,
};
use serde_json::json;

/// Build an in-memory PDF with one page per entry; `None` yields a page without any text object.
fn build_pdf(pages: &[Option<&str>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids = Vec::new();
    for page in pages {
        let operations = match page {
            Some(text) => vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(12)]),
                Operation::new("Td", vec![Object::Integer(72), Object::Integer(720)]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
            None => vec![
                Operation::new("q", vec![]),
                Operation::new("Q", vec![]),
            ],
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
        });
        kids.push(Object::from(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("save pdf");
    bytes
}

fn config_for(server: &MockServer) -> Config {
    let values: HashMap<&str, String> = HashMap::from([
        ("SUMMARIZATION_PROVIDER", "huggingface".to_string()),
        ("SUMMARIZATION_MODEL", "facebook/bart-large-cnn".to_string()),
        ("HUGGINGFACE_API_URL", server.base_url()),
    ]);
    Config::from_lookup(|key| values.get(key).cloned()).expect("config")
}

fn pipeline_for(server: &MockServer) -> SummaryPipeline {
    let summarizer = get_summarization_client(&config_for(server)).expect("client");
    SummaryPipeline::new(Arc::new(LopdfExtractor::new()), summarizer)
}

#[test]
fn lopdf_extractor_reads_pages_in_order_and_skips_blank_ones() {
    let pdf = build_pdf(&[Some("First page"), None, Some("Third page")]);
    let pages = LopdfExtractor::new()
        .extract_pages(&pdf)
        .expect("extraction");

    assert_eq!(pages.len(), 3);
    assert!(pages[0].as_deref().unwrap_or_default().contains("First page"));
    assert!(pages[1].is_none());
    assert!(pages[2].as_deref().unwrap_or_default().contains("Third page"));
}

#[tokio::test]
async fn hello_world_pdf_is_extracted_and_summarized_in_one_chunk() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/facebook/bart-large-cnn")
                .json_body_partial(
                    r#"{"inputs":"Hello world\n","parameters":{"max_length":150,"min_length":50,"do_sample":false}}"#,
                );
            then.status(200)
                .json_body(json!([{ "summary_text": "A friendly greeting." }]));
        })
        .await;
    let pipeline = pipeline_for(&server);

    let (extracted, outcome) = pipeline
        .summarize_pdf(build_pdf(&[Some("Hello world")]))
        .await
        .expect("summary");

    assert_eq!(extracted.text, "Hello world\n");
    assert_eq!(extracted.pages, 1);
    assert_eq!(outcome.chunk_count, 1);
    assert_eq!(outcome.summary, "A friendly greeting.");
    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn image_only_pdf_reports_no_text_and_never_calls_the_model() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200)
                .json_body(json!([{ "summary_text": "unused" }]));
        })
        .await;
    let pipeline = pipeline_for(&server);

    let extracted = pipeline
        .extract_text(build_pdf(&[None, None]))
        .await
        .expect("extraction");
    assert!(extracted.is_blank());
    assert_eq!(extracted.pages, 2);
    assert_eq!(extracted.pages_with_text, 0);

    let error = pipeline
        .summarize_pdf(build_pdf(&[None]))
        .await
        .expect_err("no text");
    assert!(matches!(error, PipelineError::EmptyText));
    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn corrupt_pdf_surfaces_extraction_error() {
    let server = MockServer::start_async().await;
    let pipeline = pipeline_for(&server);

    let error = pipeline
        .extract_text(b"%PDF-1.5 truncated garbage".to_vec())
        .await
        .expect_err("corrupt");
    assert!(matches!(error, PipelineError::Extraction(_)));
    assert_eq!(pipeline.metrics_snapshot().failures, 1);
}

#[tokio::test]
async fn long_text_is_summarized_per_chunk_and_joined_in_order() {
    let server = MockServer::start_async().await;
    let first = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/facebook/bart-large-cnn")
                .body_contains("aaaa");
            then.status(200)
                .json_body(json!([{ "summary_text": " First half.\n" }]));
        })
        .await;
    let second = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/facebook/bart-large-cnn")
                .body_contains("bbbb");
            then.status(200)
                .json_body(json!([{ "summary_text": "Second half. " }]));
        })
        .await;
    let pipeline = pipeline_for(&server);
    let text = format!("{}{}", "a".repeat(1024), "b".repeat(1024));

    let outcome = pipeline.summarize_text(&text).await.expect("summary");
    assert_eq!(outcome.chunk_count, 2);
    // Fragments are joined as returned; only the joined summary is trimmed.
    assert_eq!(outcome.summary, "First half.\n Second half.");
    first.assert_hits_async(1).await;
    second.assert_hits_async(1).await;

    // Deterministic decoding: the same text gives the same summary.
    let again = pipeline.summarize_text(&text).await.expect("summary");
    assert_eq!(again, outcome);
}

#[tokio::test]
async fn provider_error_aborts_without_partial_summary() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/facebook/bart-large-cnn");
            then.status(500).body("CUDA out of memory");
        })
        .await;
    let pipeline = pipeline_for(&server);

    let error = pipeline
        .summarize_text("Some extracted text\n")
        .await
        .expect_err("provider failure");
    assert!(matches!(error, PipelineError::Summarization { chunk: 1, total: 1, .. }));
    assert!(error.to_string().contains("CUDA out of memory"));
    assert_eq!(pipeline.metrics_snapshot().summaries_generated, 0);
}
