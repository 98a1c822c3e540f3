pub mod prompt;

use tracing::{error, info, warn};

use crate::constants::messages;
use crate::data::market::MarketSnapshot;
use crate::llm::{safety::PERMISSIVE, LlmState};

pub use prompt::build_prompt;

/// Turns a question plus snapshot into the text sent back to the user
#[derive(Clone, Debug)]
pub struct AnswerComposer {
    llm: LlmState,
}

impl AnswerComposer {
    pub fn new(llm: LlmState) -> Self {
        Self { llm }
    }

    pub fn llm_state(&self) -> &LlmState {
        &self.llm
    }

    /// Never fails: every error becomes one of the fixed fallback sentences.
    pub async fn get_llm_response(&self, user_query: &str, market_data: &MarketSnapshot) -> String {
        let client = match &self.llm {
            LlmState::Ready(client) => client,
            LlmState::Unavailable(reason) => {
                warn!("⚠️ [COMPOSER] LLM unavailable ({}), skipping call", reason);
                return messages::LLM_UNAVAILABLE.to_string();
            }
        };

        let prompt = build_prompt(user_query, market_data);

        match client.complete(&prompt, &PERMISSIVE).await {
            Ok(answer) if answer.trim().is_empty() => {
                error!("❌ [COMPOSER] LLM returned a blank answer");
                messages::PROCESSING_PROBLEM.to_string()
            }
            Ok(answer) => {
                info!(
                    "🤖 [COMPOSER] Answer received from {} ({} chars)",
                    client.name(),
                    answer.chars().count()
                );
                answer
            }
            Err(e) => {
                error!("❌ [COMPOSER] LLM call failed: {}", e);
                messages::PROCESSING_PROBLEM.to_string()
            }
        }
    }
}
