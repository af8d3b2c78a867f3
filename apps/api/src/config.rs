use anyhow::{Context, Result};

/// Application configuration loaded from environment variables once at startup.
/// Optional integrations (Gemini, SMTP) are carried as `Option`; endpoints that
/// need an absent one return a configuration error at request time.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub smtp: Option<SmtpConfig>,
    pub port: u16,
    pub rust_log: String,
}

/// SMTP settings for the contact endpoint. Present only when every required
/// variable (`SMTP_HOST`, `SMTP_PORT`, `SMTP_USER`, `SMTP_PASS`) is set.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Destination for contact submissions. `CONTACT_EMAIL`, falling back to
    /// the SMTP username.
    pub contact_email: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            smtp: SmtpConfig::from_env()?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl SmtpConfig {
    fn from_env() -> Result<Option<Self>> {
        let (Some(host), Some(port), Some(username), Some(password)) = (
            optional_env("SMTP_HOST"),
            optional_env("SMTP_PORT"),
            optional_env("SMTP_USER"),
            optional_env("SMTP_PASS"),
        ) else {
            return Ok(None);
        };

        let port = port
            .parse::<u16>()
            .context("SMTP_PORT must be a valid port number")?;
        let contact_email = optional_env("CONTACT_EMAIL").unwrap_or_else(|| username.clone());

        Ok(Some(SmtpConfig {
            host,
            port,
            username,
            password,
            contact_email,
        }))
    }
}

/// Reads an environment variable, treating empty values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
