// Contact form relay: one handler validating the submission, one mailer
// composing and dispatching it over SMTP.

pub mod handlers;
pub mod mailer;

pub use mailer::Mailer;
