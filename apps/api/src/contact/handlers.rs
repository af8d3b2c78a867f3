//! Axum route handler for the contact form.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;

use super::mailer::ContactSubmission;

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: &'static str,
}

/// POST /api/contact
///
/// Field validation comes before any mail work, so a half-filled form never
/// reaches the SMTP layer.
pub async fn handle_contact(
    State(state): State<AppState>,
    Json(request): Json<ContactRequest>,
) -> Result<Json<ContactResponse>, AppError> {
    let (Some(name), Some(email), Some(subject), Some(message)) = (
        optional_text(&request.name),
        optional_text(&request.email),
        optional_text(&request.subject),
        optional_text(&request.message),
    ) else {
        return Err(AppError::Validation("모든 필드를 입력해주세요.".to_string()));
    };

    let submission = ContactSubmission {
        name,
        email,
        subject,
        message,
    };
    state.mailer.send_contact(&submission).await?;

    info!("Contact form relayed for {email}");

    Ok(Json(ContactResponse {
        success: true,
        message: "문의가 성공적으로 전송되었습니다.",
    }))
}

/// A field counts as present only when it has non-whitespace content.
fn optional_text(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::Mailer;
    use crate::llm_client::{LlmError, TextGenerator};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct NoopGenerator;

    #[async_trait]
    impl TextGenerator for NoopGenerator {
        async fn generate(&self, _prompt: &str, _models: &[&str]) -> Result<String, LlmError> {
            Ok(String::new())
        }
    }

    fn test_state() -> AppState {
        AppState {
            llm: Arc::new(NoopGenerator),
            mailer: Mailer::new(None),
        }
    }

    fn full_request() -> ContactRequest {
        ContactRequest {
            name: Some("홍길동".to_string()),
            email: Some("hong@example.com".to_string()),
            subject: Some("가격 문의".to_string()),
            message: Some("안녕하세요.".to_string()),
        }
    }

    #[tokio::test]
    async fn test_missing_field_fails_before_mail_configuration() {
        let request = ContactRequest {
            email: None,
            ..full_request()
        };

        let err = handle_contact(State(test_state()), Json(request))
            .await
            .unwrap_err();
        match err {
            AppError::Validation(msg) => assert_eq!(msg, "모든 필드를 입력해주세요."),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_whitespace_only_field_counts_as_missing() {
        let request = ContactRequest {
            subject: Some("   ".to_string()),
            ..full_request()
        };

        let err = handle_contact(State(test_state()), Json(request))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_complete_form_without_smtp_is_a_config_error() {
        let err = handle_contact(State(test_state()), Json(full_request()))
            .await
            .unwrap_err();
        match err {
            AppError::Config(msg) => {
                assert_eq!(msg, "이메일 서버 설정이 완료되지 않았습니다.")
            }
            other => panic!("expected Config, got {other:?}"),
        }
    }
}
