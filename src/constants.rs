//! Application-wide constants
//!
//! User-facing sentences, default endpoints and timeouts live here so the
//! reply contract can be read in one place.

use std::time::Duration;

/// Fixed sentences sent back to the chat
pub mod messages {
    /// Reply to the start command
    pub const GREETING: &str = "Merhaba! Piyasa verileri hakkında bilgi almak için sorunuzu yazın.";

    /// Market-data endpoint failed; the composer is not called
    pub const DATA_UNAVAILABLE: &str =
        "Piyasa verileri şu anda alınamıyor. Lütfen daha sonra tekrar deneyin.";

    /// Completion service could not be configured at startup
    pub const LLM_UNAVAILABLE: &str =
        "LLM modeli şu anda mevcut değil. Lütfen daha sonra tekrar deneyin.";

    /// Completion call failed
    pub const PROCESSING_PROBLEM: &str =
        "Veri işlenirken bir sorun oluştu. Lütfen daha sonra tekrar deneyin.";

    /// What the model is told to answer when no record matches
    pub const NOT_FOUND: &str = "İstediğiniz bilgi mevcut verilerde bulunmuyor.";
}

/// Market-data endpoint
pub mod data {
    use super::*;

    pub const DEFAULT_DATA_API_URL: &str =
        "https://uky2iqnwpi.execute-api.eu-central-1.amazonaws.com/prod/data";

    pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
}

/// Completion service
pub mod llm {
    use super::*;

    pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

    pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";

    pub const DEFAULT_LLM_TIMEOUT: Duration = Duration::from_secs(30);
}

/// Telegram Bot API
pub mod telegram {
    use super::*;

    pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

    /// Long-poll duration passed to getUpdates
    pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(30);

    /// Added on top of the poll timeout for the HTTP request itself
    pub const REQUEST_TIMEOUT_MARGIN: Duration = Duration::from_secs(10);

    /// Pause after a failed getUpdates when Telegram gives no retry_after
    pub const DEFAULT_ERROR_BACKOFF: Duration = Duration::from_secs(3);

    /// How long shutdown waits for replies that are still being produced
    pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

    /// Hard limit for one sendMessage text, counted in characters
    pub const MAX_MESSAGE_CHARS: usize = 4096;

    pub const START_COMMAND: &str = "/start";
}

/// Environment variable names
pub mod env {
    pub const CONFIG_PATH: &str = "PIYASA_BOT_CONFIG";
    pub const TELEGRAM_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
    pub const LLM_API_KEY: &str = "LLM_API_KEY";
    pub const DATA_API_URL: &str = "DATA_API_URL";
    pub const LLM_MODEL: &str = "LLM_MODEL";
}
