//! # panelbot application
//!
//! Wires panelbot-core, storage, panel-client, and handler-chain into the
//! Telegram bot: config and CLI, per-user sessions, keyboard builders, the
//! teloxide transport, and the handler set (join gate, admin conversations,
//! dynamic menus).

pub mod cli;
pub mod components;
pub mod config;
pub mod handlers;
pub mod keyboards;
pub mod runner;
pub mod session;
pub mod telegram;

pub use cli::{load_config, Cli, Commands};
pub use components::{build_handler_chain, AppComponents};
pub use config::BotConfig;
pub use runner::run_bot;
pub use session::{Conversation, PanelDraft, Session, SessionStore};
pub use telegram::{run_dispatcher, TelegramBotAdapter};
