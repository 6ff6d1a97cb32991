use serde::Serialize;
use std::env;
use thiserror::Error;

const DEFAULT_HUGGINGFACE_API_URL: &str = "https://api-inference.huggingface.co/models";
const DEFAULT_HUGGINGFACE_MODEL: &str = "facebook/bart-large-cnn";
const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the PDF summarizer.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend used to turn chunks into summaries.
    pub summarization_provider: SummarizationProvider,
    /// Model identifier passed to the provider.
    pub summarization_model: String,
    /// Base URL of the Hugging Face style inference endpoint.
    pub huggingface_api_url: String,
    /// Optional bearer token for the inference endpoint.
    pub huggingface_api_token: Option<String>,
    /// Base URL of the Ollama runtime.
    pub ollama_url: String,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
    /// Strings shown on the web page.
    pub labels: PageLabels,
}

/// Supported summarization backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SummarizationProvider {
    /// Hosted (or self-hosted) Hugging Face inference endpoint running a seq2seq model.
    HuggingFace,
    /// Local Ollama runtime prompted to summarize.
    Ollama,
}

impl SummarizationProvider {
    fn default_model(self) -> &'static str {
        match self {
            Self::HuggingFace => DEFAULT_HUGGINGFACE_MODEL,
            Self::Ollama => DEFAULT_OLLAMA_MODEL,
        }
    }
}

impl std::str::FromStr for SummarizationProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "huggingface" | "hf" => Ok(Self::HuggingFace),
            "ollama" => Ok(Self::Ollama),
            _ => Err(()),
        }
    }
}

/// Display strings for the single-page UI.
#[derive(Debug, Clone, Serialize)]
pub struct PageLabels {
    /// Page heading and document title.
    pub title: String,
    /// Line shown under the heading, above the upload form.
    pub upload_prompt: String,
    /// Caption of the button that starts summarization.
    pub trigger: String,
    /// Text next to the busy indicator while summarization runs.
    pub busy: String,
    /// Notice shown once the summary is ready.
    pub success: String,
}

impl Default for PageLabels {
    fn default() -> Self {
        Self {
            title: "PDF Summary Generator".into(),
            upload_prompt: "Upload a PDF file and get a summary".into(),
            trigger: "Summarize".into(),
            busy: "Summarizing...".into(),
            success: "Summary complete!".into(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as unset so that `.env` templates with empty entries fall back to
    /// defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let summarization_provider = match get("SUMMARIZATION_PROVIDER") {
            Some(value) => value.parse().map_err(|()| {
                ConfigError::InvalidValue(format!("SUMMARIZATION_PROVIDER={value}"))
            })?,
            None => SummarizationProvider::HuggingFace,
        };
        let server_port = get("SERVER_PORT")
            .map(|value| {
                value
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
            })
            .transpose()?;

        let defaults = PageLabels::default();
        let labels = PageLabels {
            title: get("APP_TITLE").unwrap_or(defaults.title),
            upload_prompt: get("APP_UPLOAD_PROMPT").unwrap_or(defaults.upload_prompt),
            trigger: get("APP_TRIGGER_LABEL").unwrap_or(defaults.trigger),
            busy: get("APP_BUSY_LABEL").unwrap_or(defaults.busy),
            success: get("APP_SUCCESS_LABEL").unwrap_or(defaults.success),
        };

        Ok(Self {
            summarization_model: get("SUMMARIZATION_MODEL")
                .unwrap_or_else(|| summarization_provider.default_model().to_string()),
            summarization_provider,
            huggingface_api_url: get("HUGGINGFACE_API_URL")
                .unwrap_or_else(|| DEFAULT_HUGGINGFACE_API_URL.to_string()),
            huggingface_api_token: get("HUGGINGFACE_API_TOKEN"),
            ollama_url: get("OLLAMA_URL").unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            server_port,
            labels,
        })
    }
}

/// Load configuration from the environment, reading a `.env` file first when one is present.
pub fn init_config() -> Result<Config, ConfigError> {
    dotenvy::dotenv().ok();
    Config::from_env()
}
