pub mod gemini;
pub mod openai;
pub mod safety;

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::{LlmConfig, LlmProvider};
use crate::error::LlmError;

pub use gemini::GeminiClient;
pub use openai::OpenAiClient;
pub use safety::{HarmBlockThreshold, HarmCategory, SafetySetting};

/// A text-completion backend
#[async_trait]
pub trait CompletionService: Send + Sync {
    fn name(&self) -> &str;

    /// Submits one prompt and returns the model's text unmodified.
    async fn complete(&self, prompt: &str, safety: &[SafetySetting]) -> Result<String, LlmError>;
}

/// Outcome of configuring the completion service at startup
///
/// Built once and shared for the process lifetime. A failed configuration is
/// kept as `Unavailable` and never retried.
#[derive(Clone)]
pub enum LlmState {
    Ready(Arc<dyn CompletionService>),
    Unavailable(String),
}

impl LlmState {
    pub fn from_config(config: &LlmConfig) -> Self {
        match build_client(config) {
            Ok(client) => {
                info!(
                    "✅ [LLM] Completion service configured ({} / {})",
                    client.name(),
                    config.model
                );
                LlmState::Ready(client)
            }
            Err(e) => {
                error!("❌ [LLM] Completion service could not be configured: {}", e);
                LlmState::Unavailable(e.to_string())
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, LlmState::Ready(_))
    }
}

impl fmt::Debug for LlmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmState::Ready(client) => f.debug_tuple("Ready").field(&client.name()).finish(),
            LlmState::Unavailable(reason) => f.debug_tuple("Unavailable").field(reason).finish(),
        }
    }
}

pub fn build_client(config: &LlmConfig) -> Result<Arc<dyn CompletionService>, LlmError> {
    let api_key = config
        .api_key
        .as_ref()
        .ok_or_else(|| LlmError::NotConfigured("no API key (set GEMINI_API_KEY)".to_string()))?;

    let client: Arc<dyn CompletionService> = match config.provider {
        LlmProvider::Gemini => Arc::new(GeminiClient::new(api_key.clone(), config)?),
        LlmProvider::OpenAi => Arc::new(OpenAiClient::new(api_key, config)?),
    };
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Secret;

    #[test]
    fn test_missing_key_is_unavailable() {
        let state = LlmState::from_config(&LlmConfig::default());
        assert!(!state.is_ready());
        match state {
            LlmState::Unavailable(reason) => assert!(reason.contains("GEMINI_API_KEY")),
            LlmState::Ready(_) => panic!("should not be ready without a key"),
        }
    }

    #[test]
    fn test_gemini_with_key_is_ready() {
        let config = LlmConfig {
            api_key: Some(Secret::new("k")),
            ..Default::default()
        };
        let state = LlmState::from_config(&config);
        assert!(state.is_ready());
        assert_eq!(format!("{:?}", state), "Ready(\"gemini\")");
    }

    #[test]
    fn test_openai_with_key_is_ready() {
        let config = LlmConfig {
            provider: LlmProvider::OpenAi,
            model: "gpt-4o-mini".to_string(),
            api_key: Some(Secret::new("k")),
            ..Default::default()
        };
        let client = build_client(&config).unwrap();
        assert_eq!(client.name(), "openai");
    }
}

#[cfg(test)]
pub(crate) mod testing;
