use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, info};

use super::{CompletionService, SafetySetting};
use crate::config::{LlmConfig, Secret};
use crate::error::LlmError;

/// Any OpenAI-compatible chat-completions endpoint
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_key: &Secret, config: &LlmConfig) -> Result<Self, LlmError> {
        let mut oa_config = OpenAIConfig::new().with_api_key(api_key.expose());
        if let Some(url) = &config.base_url {
            info!("Using Custom OpenAI Base URL: {}", url);
            oa_config = oa_config.with_api_base(url);
        }

        let http = reqwest::Client::builder().timeout(config.timeout()).build()?;
        let client = Client::with_config(oa_config).with_http_client(http);

        Ok(Self {
            client,
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, prompt: &str, safety: &[SafetySetting]) -> Result<String, LlmError> {
        if !safety.is_empty() {
            debug!("Safety settings are not supported by OpenAI-compatible APIs; skipping");
        }

        info!("🤖 Sending request to LLM (Model: {})...", self.model);

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt)
                    .build()?,
            )])
            .build()?;

        let response = self.client.chat().create(request).await?;

        info!("🤖 LLM Response received.");

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| LlmError::EmptyResponse("no message content".to_string()))
    }
}
