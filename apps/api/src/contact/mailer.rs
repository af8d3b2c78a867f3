//! SMTP dispatch for contact submissions.
//!
//! The mailer holds the optional SMTP settings captured at startup. Without
//! them every send fails with a configuration error; with them the submission
//! is composed as a multipart (plain + HTML) message, sent from the relay
//! account with the submitter as reply-to, and delivered to the configured
//! contact address.

use anyhow::Context;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info};

use crate::config::SmtpConfig;
use crate::errors::AppError;

/// A validated contact form submission. All fields are non-blank.
#[derive(Debug)]
pub struct ContactSubmission<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub subject: &'a str,
    pub message: &'a str,
}

#[derive(Clone)]
pub struct Mailer {
    smtp: Option<SmtpConfig>,
}

impl Mailer {
    pub fn new(smtp: Option<SmtpConfig>) -> Self {
        Mailer { smtp }
    }

    pub async fn send_contact(&self, submission: &ContactSubmission<'_>) -> Result<(), AppError> {
        let Some(smtp) = &self.smtp else {
            return Err(AppError::Config(
                "이메일 서버 설정이 완료되지 않았습니다.".to_string(),
            ));
        };

        let email = build_message(smtp, submission).map_err(dispatch_error)?;
        let transport = build_transport(smtp).map_err(dispatch_error)?;
        transport
            .send(email)
            .await
            .map_err(|e| dispatch_error(e.into()))?;

        info!("Contact mail dispatched for {}", submission.email);
        Ok(())
    }
}

fn build_transport(smtp: &SmtpConfig) -> anyhow::Result<AsyncSmtpTransport<Tokio1Executor>> {
    let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)
        .context("invalid SMTP relay host")?
        .port(smtp.port)
        .credentials(Credentials::new(
            smtp.username.clone(),
            smtp.password.clone(),
        ))
        .build();
    Ok(transport)
}

fn build_message(smtp: &SmtpConfig, submission: &ContactSubmission<'_>) -> anyhow::Result<Message> {
    let from = Mailbox::new(
        Some(submission.name.to_string()),
        smtp.username.parse().context("invalid SMTP sender address")?,
    );
    let to: Mailbox = smtp
        .contact_email
        .parse()
        .context("invalid contact recipient address")?;
    let reply_to: Mailbox = submission
        .email
        .parse()
        .context("invalid reply-to address")?;

    let message = Message::builder()
        .from(from)
        .to(to)
        .reply_to(reply_to)
        .subject(format!("[문의] {}", submission.subject))
        .multipart(MultiPart::alternative_plain_html(
            plain_body(submission),
            html_body(submission),
        ))?;

    Ok(message)
}

fn plain_body(submission: &ContactSubmission<'_>) -> String {
    format!(
        "문의자: {name}\n이메일: {email}\n\n제목: {subject}\n\n문의 내용:\n{message}",
        name = submission.name,
        email = submission.email,
        subject = submission.subject,
        message = submission.message,
    )
}

fn html_body(submission: &ContactSubmission<'_>) -> String {
    format!(
        "<div style=\"font-family: sans-serif; line-height: 1.6;\">\
         <h2>새로운 문의가 도착했습니다</h2>\
         <p><strong>문의자:</strong> {name}</p>\
         <p><strong>이메일:</strong> {email}</p>\
         <p><strong>제목:</strong> {subject}</p>\
         <hr>\
         <p>{message}</p>\
         </div>",
        name = submission.name,
        email = submission.email,
        subject = submission.subject,
        message = submission.message.replace('\n', "<br>"),
    )
}

fn dispatch_error(err: anyhow::Error) -> AppError {
    error!("Contact mail dispatch failed: {err:#}");
    AppError::Upstream("이메일 전송 중 오류가 발생했습니다. 다시 시도해주세요.".to_string())
}
