use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every failure leaves the process as `{"error": "<message>"}` with the
/// variant's status code; the messages are the user-facing Korean strings.
#[derive(Debug, Error)]
pub enum AppError {
    /// Required credential or setting is absent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller input is missing or semantically empty.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An external collaborator failed (model tiers exhausted, mail rejected).
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// The model answered but no valid record could be recovered.
    #[error("Recovery error: {0}")]
    Recovery(String),
}

impl AppError {
    /// Maps a model-client failure onto the taxonomy: a missing credential is
    /// a configuration error; anything else is an upstream error reported
    /// with the calling endpoint's own message.
    pub fn from_llm(err: LlmError, upstream_message: &str) -> Self {
        match err {
            LlmError::MissingApiKey => {
                AppError::Config("GEMINI_API_KEY가 설정되지 않았습니다.".to_string())
            }
            other => {
                tracing::error!("Model invocation failed: {other}");
                AppError::Upstream(upstream_message.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Config(msg) => {
                tracing::error!("Configuration error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            AppError::Upstream(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Recovery(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}
