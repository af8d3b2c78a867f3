/// Gemini client: the single point of entry for all generative-model calls.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// All model interactions MUST go through this module.
///
/// Every call takes an ordered model chain. Tiers are tried in order, one
/// attempt each, first success wins; the terminal tier's failure propagates.
/// No retries, no backoff, no explicit request timeout.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Chain for structured estimation calls and the lighter analysis calls.
pub const DEFAULT_MODEL_CHAIN: &[&str] = &["gemini-2.0-flash-exp", "gemini-1.5-flash"];

/// Chain for the long-form analysis calls; leads with the newest model.
pub const EXTENDED_MODEL_CHAIN: &[&str] =
    &["gemini-2.5-flash", "gemini-2.0-flash-exp", "gemini-1.5-flash"];

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    #[error("model chain is empty")]
    EmptyModelChain,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Abstraction over the generative-text collaborator so the pipeline and the
/// handlers can be exercised against a scripted fake in tests.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends `prompt` to each model in `models` in order and returns the raw
    /// text of the first successful completion.
    async fn generate(&self, prompt: &str, models: &[&str]) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's parts. Empty when the model
    /// returned no text content.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// The single Gemini client shared by every endpoint via `AppState`.
/// The API key is optional: calls without one fail before any network I/O.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }

    /// One attempt against one model. Any failure here is the caller's to
    /// swallow or propagate depending on the tier.
    async fn call_model(&self, api_key: &str, model: &str, prompt: &str) -> Result<String, LlmError> {
        let request_body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(format!("{GEMINI_API_URL}/{model}:generateContent"))
            .query(&[("key", api_key)])
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse error message
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: GenerateContentResponse = response.json().await?;

        if let Some(usage) = &completion.usage_metadata {
            debug!(
                "Model call succeeded: model={}, prompt_tokens={}, completion_tokens={}",
                model, usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Ok(completion.text())
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, models: &[&str]) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;
        let (terminal, fallback_tiers) = models.split_last().ok_or(LlmError::EmptyModelChain)?;

        for model in fallback_tiers {
            match self.call_model(api_key, model, prompt).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    warn!("Model tier {model} failed, falling back: {e}");
                }
            }
        }

        self.call_model(api_key, terminal, prompt).await
    }
}
