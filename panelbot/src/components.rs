//! Component assembly: database, bot adapter, sessions, and the handler
//! chain. Isolated from the runner so tests can build the same chain around a
//! mock bot and an in-memory database.

use std::sync::Arc;

use handler_chain::HandlerChain;
use panelbot_core::Bot;
use storage::Database;

use crate::config::BotConfig;
use crate::handlers::{
    AdminMenuHandler, CallbackFallbackHandler, CheckJoinHandler, ConversationHandler,
    DynamicMenuHandler, JoinGateMiddleware, LoggingMiddleware, StartHandler,
};
use crate::session::SessionStore;

/// Everything the handler set needs. Cloning shares the same database pool,
/// bot, and session map.
#[derive(Clone)]
pub struct AppComponents {
    pub config: BotConfig,
    pub db: Database,
    pub bot: Arc<dyn Bot>,
    pub sessions: SessionStore,
}

impl AppComponents {
    pub fn new(config: BotConfig, db: Database, bot: Arc<dyn Bot>) -> Self {
        Self {
            config,
            db,
            bot,
            sessions: SessionStore::new(),
        }
    }
}

/// Builds the full chain. Order matters: the gate runs before any handler,
/// `/start` outranks active conversations, conversations outrank the admin
/// menus, and the dynamic renderer sits just above the terminal fallback.
pub fn build_handler_chain(components: &AppComponents) -> HandlerChain {
    HandlerChain::new()
        .add_middleware(Arc::new(LoggingMiddleware))
        .add_middleware(Arc::new(JoinGateMiddleware::new(components)))
        .add_handler(Arc::new(StartHandler::new(components)))
        .add_handler(Arc::new(CheckJoinHandler::new(components)))
        .add_handler(Arc::new(ConversationHandler::new(components)))
        .add_handler(Arc::new(AdminMenuHandler::new(components)))
        .add_handler(Arc::new(DynamicMenuHandler::new(components)))
        .add_handler(Arc::new(CallbackFallbackHandler::new(components)))
}
