use async_trait::async_trait;
use tracing::debug;

use crate::constants::telegram::MAX_MESSAGE_CHARS;
use crate::error::TelegramError;
use crate::telegram::{split_message, TelegramClient};

/// Reply side of the chat connection
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), TelegramError>;
}

#[async_trait]
impl ChatTransport for TelegramClient {
    /// Sends `text`, split into several messages if it exceeds Telegram's limit.
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        let chunks = split_message(text, MAX_MESSAGE_CHARS);
        if chunks.len() > 1 {
            debug!("Reply split into {} messages", chunks.len());
        }

        for chunk in chunks {
            self.send_message(chat_id, &chunk).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Secret, TelegramConfig};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sent_ok() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": {"message_id": 3, "chat": {"id": 42, "type": "private"}}
        }))
    }

    #[tokio::test]
    async fn test_oversized_reply_becomes_several_messages() {
        let server = MockServer::start().await;
        let first = format!("{}\n", "a".repeat(3000));
        let second = "b".repeat(3000);

        for chunk in [&first, &second] {
            Mock::given(method("POST"))
                .and(path("/botT/sendMessage"))
                .and(body_json(json!({"chat_id": 42, "text": chunk})))
                .respond_with(sent_ok())
                .expect(1)
                .mount(&server)
                .await;
        }

        let config = TelegramConfig {
            api_base: server.uri(),
            request_timeout_secs: Some(2),
            ..Default::default()
        };
        let client = TelegramClient::new(&Secret::new("T"), &config).unwrap();

        client
            .send_text(42, &format!("{}{}", first, second))
            .await
            .unwrap();

        server.verify().await;
        let texts: Vec<String> = server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .map(|r| {
                let body: serde_json::Value = r.body_json().unwrap();
                body["text"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(texts, vec![first, second]);
        assert!(texts.iter().all(|t| t.chars().count() <= MAX_MESSAGE_CHARS));
    }

    #[tokio::test]
    async fn test_short_reply_is_one_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botT/sendMessage"))
            .and(body_json(json!({"chat_id": 42, "text": "Merhaba"})))
            .respond_with(sent_ok())
            .expect(1)
            .mount(&server)
            .await;

        let config = TelegramConfig {
            api_base: server.uri(),
            request_timeout_secs: Some(2),
            ..Default::default()
        };
        let client = TelegramClient::new(&Secret::new("T"), &config).unwrap();

        client.send_text(42, "Merhaba").await.unwrap();
    }
}
