use std::sync::Arc;
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

use super::transport::ChatTransport;
use crate::composer::AnswerComposer;
use crate::constants::{messages, telegram::START_COMMAND};
use crate::data::MarketDataSource;
use crate::telegram::{Message, Update};

/// What an inbound message asks the bot to do
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inbound {
    Start,
    Text(String),
    Ignored,
}

/// `/start` (optionally addressed as `/start@<bot>`, any case) or plain text.
/// Other commands and non-text messages are ignored.
pub fn classify(message: &Message, bot_username: Option<&str>) -> Inbound {
    let Some(text) = message.text.as_deref() else {
        return Inbound::Ignored;
    };

    if !message.starts_with_command() {
        return Inbound::Text(text.to_string());
    }

    let command = text.split_whitespace().next().unwrap_or_default();
    let (name, target) = match command.split_once('@') {
        Some((name, target)) => (name, Some(target)),
        None => (command, None),
    };

    let addressed_to_us = match (target, bot_username) {
        (None, _) => true,
        (Some(target), Some(me)) => target.eq_ignore_ascii_case(me),
        (Some(_), None) => false,
    };

    if name.eq_ignore_ascii_case(START_COMMAND) && addressed_to_us {
        Inbound::Start
    } else {
        Inbound::Ignored
    }
}

/// Runs fetch then compose for each message. Holds no per-chat state.
pub struct Dispatcher {
    market: Arc<dyn MarketDataSource>,
    composer: AnswerComposer,
    bot_username: Option<String>,
}

impl Dispatcher {
    pub fn new(market: Arc<dyn MarketDataSource>, composer: AnswerComposer) -> Self {
        Self {
            market,
            composer,
            bot_username: None,
        }
    }

    pub fn with_bot_username(mut self, username: Option<String>) -> Self {
        self.bot_username = username;
        self
    }

    pub fn composer(&self) -> &AnswerComposer {
        &self.composer
    }

    /// Fetch, then compose. A failed fetch short-circuits to the fixed notice.
    pub async fn answer_question(&self, question: &str) -> String {
        let Some(snapshot) = self.market.fetch_market_data().await else {
            return messages::DATA_UNAVAILABLE.to_string();
        };

        self.composer.get_llm_response(question, &snapshot).await
    }

    /// The reply for one inbound event, or `None` when it gets no reply
    pub async fn reply_for(&self, inbound: &Inbound) -> Option<String> {
        match inbound {
            Inbound::Start => Some(messages::GREETING.to_string()),
            Inbound::Text(text) => Some(self.answer_question(text).await),
            Inbound::Ignored => None,
        }
    }

    pub async fn handle_update(&self, update: Update, transport: &dyn ChatTransport) {
        let Some(message) = update.message else {
            debug!("Skipping update {} without a new message", update.update_id);
            return;
        };

        let span = info_span!(
            "message",
            request_id = %Uuid::new_v4(),
            chat_id = message.chat.id
        );

        async {
            let inbound = classify(&message, self.bot_username.as_deref());
            match &inbound {
                Inbound::Start => info!("👋 [BOT] Start command received"),
                Inbound::Text(text) => info!("💬 [BOT] Message received: {}", text),
                Inbound::Ignored => {
                    debug!("Ignoring message {}", message.message_id);
                    return;
                }
            }

            let Some(reply) = self.reply_for(&inbound).await else {
                return;
            };

            if let Err(e) = transport.send_text(message.chat.id, &reply).await {
                error!("❌ [BOT] Failed to send reply: {}", e);
            }
        }
        .instrument(span)
        .await
    }
}
