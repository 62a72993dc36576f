//! Telegram transport: teloxide adapters, the [`panelbot_core::Bot`]
//! implementation, and the dispatcher runner.

pub mod adapters;
pub mod bot_adapter;
pub mod runner;

pub use adapters::{TelegramCallbackWrapper, TelegramMessageWrapper, TelegramUserWrapper};
pub use bot_adapter::TelegramBotAdapter;
pub use runner::run_dispatcher;
