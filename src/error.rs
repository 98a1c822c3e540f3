//! Error types for each external boundary
//!
//! Callers that must never fail (fetcher, composer, dispatcher) turn these
//! into log lines and fixed reply sentences.

use thiserror::Error;

/// Startup configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid URL in {field}: {value} ({source})")]
    InvalidUrl {
        field: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Market-data endpoint errors
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid JSON body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Completion service errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Completion service not configured: {0}")]
    NotConfigured(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("OpenAI-compatible API error: {0}")]
    OpenAi(#[from] async_openai::error::OpenAIError),

    #[error("Response contained no text: {0}")]
    EmptyResponse(String),
}

/// Telegram Bot API errors
#[derive(Error, Debug)]
pub enum TelegramError {
    #[error("Telegram API error {code}: {description}")]
    Api {
        code: i64,
        description: String,
        retry_after: Option<u64>,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Telegram response missing result for {method}")]
    MissingResult { method: &'static str },
}

impl TelegramError {
    /// Seconds Telegram asked us to wait, if this was a flood-control reply
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            TelegramError::Api { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// reqwest errors carry the request URL, and Telegram URLs embed the bot token.
pub(crate) fn strip_url(err: reqwest::Error) -> reqwest::Error {
    err.without_url()
}
