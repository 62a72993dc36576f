//! Handler set: middleware (logging, join gate) plus the command and callback
//! handlers the chain runs in order.

mod admin;
mod conversation;
mod dynamic;
mod fallback;
mod gate;
mod logging;
mod start;

pub use admin::AdminMenuHandler;
pub use conversation::ConversationHandler;
pub use dynamic::{send_dynamic_message, DynamicMenuHandler};
pub use fallback::CallbackFallbackHandler;
pub use gate::{CheckJoinHandler, JoinGateMiddleware};
pub use logging::LoggingMiddleware;
pub use start::StartHandler;

use panelbot_core::BotError;
use storage::Database;
use tracing::warn;

use crate::config::BotConfig;

pub(crate) fn db_err<E: std::fmt::Display>(e: E) -> BotError {
    BotError::Database(e.to_string())
}

/// Primary admin from config, or a row in the admins table. Lookup failures
/// count as not-admin.
pub(crate) async fn is_admin(config: &BotConfig, db: &Database, user_id: i64) -> bool {
    if config.is_primary_admin(user_id) {
        return true;
    }
    match db.users.is_admin(user_id).await {
        Ok(extra) => extra,
        Err(e) => {
            warn!(error = %e, user_id, "Admin lookup failed");
            false
        }
    }
}
