pub mod client;
pub mod polling;
pub mod split;
pub mod types;

pub use client::TelegramClient;
pub use polling::run_polling;
pub use split::split_message;
pub use types::{Message, Update};
