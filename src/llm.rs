//! External AI bridge.
//!
//! Forwards a question plus a bounded sample of the dataset to a hosted
//! chat-completions model and returns its free-text answer. The bridge is
//! optional: with no credential configured it is constructed disabled and
//! never builds a request. A disabled bridge and a failed call are distinct
//! error variants; both surface as readable text, never a panic.

use crate::dataset::Dataset;
use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

/// Rows of the dataset included in the prompt. The sample is a fixed-size
/// prefix; bounding the payload is deliberate.
pub const AI_SAMPLE_ROWS: usize = 40;

pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Error, Debug)]
pub enum AiError {
    /// No credential configured; no network call is ever attempted.
    #[error("AI is not enabled: set OPENAI_API_KEY to turn on AI answers")]
    Disabled,

    #[error("AI request failed: {0}")]
    Request(String),
}

/// Seam between the bridge and the hosted model, so tests can substitute a
/// counting double.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, prompt: &str) -> std::result::Result<String, AiError>;
}

/// Production backend: OpenAI-compatible chat completions over reqwest.
pub struct OpenAiBackend {
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiBackend {
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        Self {
            api_key,
            model,
            base_url,
        }
    }
}

#[async_trait]
impl ChatBackend for OpenAiBackend {
    async fn complete(&self, prompt: &str) -> std::result::Result<String, AiError> {
        let client = reqwest::Client::new();
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": "You are a data analyst. Answer only from the data sample provided."},
                {"role": "user", "content": prompt}
            ],
            "temperature": 0.1,
            "max_tokens": 1000
        });

        let response = client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::Request(format!("API call failed: {}", e)))?;

        let response_json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AiError::Request(format!("failed to parse response: {}", e)))?;

        let content = response_json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| AiError::Request("no content in model response".to_string()))?;

        Ok(content.to_string())
    }
}

/// Backend standing in when the bridge is disabled. Refuses even if called.
struct NullBackend;

#[async_trait]
impl ChatBackend for NullBackend {
    async fn complete(&self, _prompt: &str) -> std::result::Result<String, AiError> {
        Err(AiError::Disabled)
    }
}

pub struct AiBridge {
    backend: Box<dyn ChatBackend>,
    enabled: bool,
}

impl AiBridge {
    /// Build from the process environment: `OPENAI_API_KEY` enables the
    /// bridge, `OPENAI_MODEL` and `OPENAI_BASE_URL` override the defaults.
    pub fn from_env() -> Self {
        match std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
        {
            Some(api_key) => Self::connect(api_key),
            None => Self::disabled(),
        }
    }

    pub fn connect(api_key: String) -> Self {
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let base_url =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        info!("AI bridge enabled (model: {})", model);
        Self {
            backend: Box::new(OpenAiBackend::new(api_key, model, base_url)),
            enabled: true,
        }
    }

    pub fn disabled() -> Self {
        Self {
            backend: Box::new(NullBackend),
            enabled: false,
        }
    }

    /// Inject a backend directly; used by tests.
    pub fn with_backend(backend: Box<dyn ChatBackend>, enabled: bool) -> Self {
        Self { backend, enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Ask the hosted model. One attempt, no retry; a failed call surfaces
    /// its error text directly.
    pub async fn ask(
        &self,
        question: &str,
        dataset: &Dataset,
    ) -> std::result::Result<String, AiError> {
        if !self.enabled {
            return Err(AiError::Disabled);
        }

        let sample = dataset
            .sample_text(AI_SAMPLE_ROWS)
            .map_err(|e| AiError::Request(format!("failed to render data sample: {}", e)))?;
        let prompt = build_prompt(question, &sample);

        self.backend.complete(&prompt).await
    }
}

fn build_prompt(question: &str, sample: &str) -> String {
    format!(
        "Answer ONLY using the Steam dataset below.\n\n\
         DATA SAMPLE:\n{}\n\n\
         QUESTION:\n{}\n\n\
         Give a clear and concise answer.",
        sample, question
    )
}
