use std::{fs, path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use pdf_summarizer::{
    config,
    extraction::LopdfExtractor,
    logging,
    presenter::{EMPTY_NOTICE, ERROR_PREFIX},
    processing::{PipelineError, SummaryPipeline},
    summarization,
};

#[derive(Parser)]
#[command(
    name = "summarize-pdf",
    about = "Extract a PDF's text and print an abstractive summary"
)]
struct Cli {
    /// PDF file to summarize.
    path: PathBuf,
    /// Print the extracted text instead of summarizing it.
    #[arg(long)]
    extract_only: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init_cli_tracing();
    let config = config::init_config().context("Failed to load config from environment")?;

    let pdf =
        fs::read(&cli.path).with_context(|| format!("Failed to read {}", cli.path.display()))?;
    let summarizer = summarization::get_summarization_client(&config)
        .context("Failed to initialize summarization client")?;
    let pipeline = SummaryPipeline::new(Arc::new(LopdfExtractor::new()), summarizer);

    let outcome = if cli.extract_only {
        pipeline.extract_text(pdf).await.and_then(|extracted| {
            if extracted.is_blank() {
                Err(PipelineError::EmptyText)
            } else {
                Ok(extracted.text)
            }
        })
    } else {
        pipeline
            .summarize_pdf(pdf)
            .await
            .map(|(_, outcome)| outcome.summary)
    };

    match outcome {
        Ok(output) => {
            println!("{output}");
            Ok(ExitCode::SUCCESS)
        }
        Err(PipelineError::EmptyText) => {
            eprintln!("{EMPTY_NOTICE}");
            Ok(ExitCode::from(2))
        }
        Err(error) => {
            eprintln!("{ERROR_PREFIX}: {error}");
            Ok(ExitCode::FAILURE)
        }
    }
}
