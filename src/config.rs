use serde::Deserialize;
use std::fmt;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tracing::info;
use url::Url;

use crate::constants;
use crate::error::ConfigError;

/// A credential that must never show up in logs
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            url: constants::data::DEFAULT_DATA_API_URL.to_string(),
            timeout_secs: constants::data::DEFAULT_FETCH_TIMEOUT.as_secs(),
        }
    }
}

impl DataConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    Gemini,
    #[serde(rename = "openai")]
    OpenAi,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub model: String,
    /// Overrides the provider's default API base
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    /// Only ever read from the environment
    #[serde(skip)]
    pub api_key: Option<Secret>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::Gemini,
            model: constants::llm::DEFAULT_MODEL.to_string(),
            base_url: None,
            timeout_secs: constants::llm::DEFAULT_LLM_TIMEOUT.as_secs(),
            api_key: None,
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub api_base: String,
    pub poll_timeout_secs: u64,
    /// Defaults to the poll timeout plus a safety margin
    pub request_timeout_secs: Option<u64>,
    pub drop_pending_updates: bool,
    pub error_backoff_secs: u64,
    /// Only ever read from the environment
    #[serde(skip)]
    pub bot_token: Option<Secret>,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: constants::telegram::DEFAULT_API_BASE.to_string(),
            poll_timeout_secs: constants::telegram::DEFAULT_POLL_TIMEOUT.as_secs(),
            request_timeout_secs: None,
            drop_pending_updates: true,
            error_backoff_secs: constants::telegram::DEFAULT_ERROR_BACKOFF.as_secs(),
            bot_token: None,
        }
    }
}

impl TelegramConfig {
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        match self.request_timeout_secs {
            Some(secs) => Duration::from_secs(secs),
            None => self.poll_timeout() + constants::telegram::REQUEST_TIMEOUT_MARGIN,
        }
    }

    pub fn error_backoff(&self) -> Duration {
        Duration::from_secs(self.error_backoff_secs)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub enabled: bool,
    pub bind: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bind: "0.0.0.0:3000".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub llm: LlmConfig,
    pub telegram: TelegramConfig,
    pub http: HttpConfig,
}

impl AppConfig {
    /// Reads the YAML file (if any), overlays environment secrets, validates.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(constants::env::CONFIG_PATH)
            .unwrap_or_else(|_| "config.yaml".to_string());

        let mut config = Self::from_file(Path::new(&path))?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("ℹ️ No config file at {} - using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        // Strip BOM if present
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        Ok(serde_yaml::from_str(content)?)
    }

    /// Overlays secrets and overrides. Blank values count as unset.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(token) = get(constants::env::TELEGRAM_BOT_TOKEN) {
            self.telegram.bot_token = Some(Secret::new(token));
        }

        if let Some(key) =
            get(constants::env::GEMINI_API_KEY).or_else(|| get(constants::env::LLM_API_KEY))
        {
            self.llm.api_key = Some(Secret::new(key));
        }

        if let Some(url) = get(constants::env::DATA_API_URL) {
            self.data.url = url;
        }

        if let Some(model) = get(constants::env::LLM_MODEL) {
            self.llm.model = model;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_url("data.url", &self.data.url)?;
        check_url("telegram.api_base", &self.telegram.api_base)?;
        if let Some(base) = &self.llm.base_url {
            check_url("llm.base_url", base)?;
        }

        if self.data.timeout_secs == 0 || self.llm.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeouts must be greater than zero".to_string(),
            ));
        }

        if self.telegram.error_backoff_secs == 0 {
            return Err(ConfigError::Invalid(
                "telegram.error_backoff_secs must be greater than zero".to_string(),
            ));
        }

        if let Some(request) = self.telegram.request_timeout_secs {
            if request <= self.telegram.poll_timeout_secs {
                return Err(ConfigError::Invalid(format!(
                    "telegram.request_timeout_secs ({}) must exceed poll_timeout_secs ({})",
                    request, self.telegram.poll_timeout_secs
                )));
            }
        }

        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::Invalid("llm.model is empty".to_string()));
        }

        if self.http.enabled {
            self.http.bind.parse::<SocketAddr>().map_err(|e| {
                ConfigError::Invalid(format!("http.bind '{}': {}", self.http.bind, e))
            })?;
        }

        Ok(())
    }
}

fn check_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|source| ConfigError::InvalidUrl {
            field,
            value: value.to_string(),
            source,
        })
}
