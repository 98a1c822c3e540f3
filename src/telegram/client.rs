use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use super::types::{
    ApiResponse, DeleteWebhookParams, GetUpdatesParams, Message, NoParams, SendMessageParams,
    Update, User,
};
use crate::config::{Secret, TelegramConfig};
use crate::error::{strip_url, TelegramError};

/// Minimal Telegram Bot API client over JSON POSTs
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    /// `{api_base}/bot{token}`; never logged
    base: String,
}

impl TelegramClient {
    pub fn new(token: &Secret, config: &TelegramConfig) -> Result<Self, TelegramError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(strip_url)?;

        Ok(Self {
            client,
            base: format!(
                "{}/bot{}",
                config.api_base.trim_end_matches('/'),
                token.expose()
            ),
        })
    }

    async fn call<P, R>(&self, method: &'static str, params: &P) -> Result<R, TelegramError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        debug!("Telegram API call: {}", method);

        let resp = self
            .client
            .post(format!("{}/{}", self.base, method))
            .json(params)
            .send()
            .await
            .map_err(strip_url)?;

        // Telegram answers errors with a JSON envelope as well
        let api: ApiResponse<R> = resp.json().await.map_err(strip_url)?;

        if !api.ok {
            return Err(TelegramError::Api {
                code: api.error_code.unwrap_or_default(),
                description: api.description.unwrap_or_default(),
                retry_after: api.parameters.and_then(|p| p.retry_after),
            });
        }

        api.result.ok_or(TelegramError::MissingResult { method })
    }

    pub async fn get_me(&self) -> Result<User, TelegramError> {
        self.call("getMe", &NoParams {}).await
    }

    pub async fn delete_webhook(&self, drop_pending_updates: bool) -> Result<bool, TelegramError> {
        self.call(
            "deleteWebhook",
            &DeleteWebhookParams {
                drop_pending_updates,
            },
        )
        .await
    }

    /// Long poll; `timeout` is how long Telegram may hold the request open.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout: Duration,
    ) -> Result<Vec<Update>, TelegramError> {
        self.call(
            "getUpdates",
            &GetUpdatesParams {
                offset,
                timeout: timeout.as_secs(),
                allowed_updates: &["message"],
            },
        )
        .await
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<Message, TelegramError> {
        self.call("sendMessage", &SendMessageParams { chat_id, text })
            .await
    }
}
