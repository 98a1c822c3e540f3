//! The slice of the Telegram Bot API object model this bot reads and writes.

use serde::{Deserialize, Serialize};

/// Envelope around every Bot API reply
#[derive(Deserialize, Debug, Clone)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
    pub parameters: Option<ResponseParameters>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ResponseParameters {
    pub retry_after: Option<u64>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub edited_message: Option<Message>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
    #[serde(default)]
    pub entities: Vec<MessageEntity>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct User {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct MessageEntity {
    #[serde(rename = "type")]
    pub kind: String,
    /// UTF-16 code units
    pub offset: usize,
    pub length: usize,
}

impl Message {
    /// True when Telegram marked the first entity as a bot command at offset 0.
    /// A leading `/` alone (e.g. `/ VIX`) is not a command.
    pub fn starts_with_command(&self) -> bool {
        self.entities
            .first()
            .is_some_and(|e| e.kind == "bot_command" && e.offset == 0)
    }
}

#[derive(Serialize, Debug)]
pub(crate) struct GetUpdatesParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    pub timeout: u64,
    pub allowed_updates: &'static [&'static str],
}

#[derive(Serialize, Debug)]
pub(crate) struct SendMessageParams<'a> {
    pub chat_id: i64,
    pub text: &'a str,
}

#[derive(Serialize, Debug)]
pub(crate) struct DeleteWebhookParams {
    pub drop_pending_updates: bool,
}

#[derive(Serialize, Debug)]
pub(crate) struct NoParams {}
