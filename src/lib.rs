//! Piyasa Bot - market data questions over Telegram
//!
//! Each chat message triggers one read of the market-data endpoint and one
//! LLM completion that picks the requested record out of the snapshot.

pub mod api;
pub mod bot;
pub mod composer;
pub mod config;
pub mod constants;
pub mod data;
pub mod error;
pub mod llm;
pub mod telegram;

// Re-export commonly used types
pub use bot::Dispatcher;
pub use composer::AnswerComposer;
pub use config::AppConfig;
pub use data::{MarketDataClient, MarketSnapshot};
pub use llm::LlmState;
