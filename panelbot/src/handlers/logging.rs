//! Logging middleware: one line per incoming event, one per outcome.

use async_trait::async_trait;
use panelbot_core::{Event, EventPayload, Middleware, Outcome, Result};
use tracing::{debug, info};

pub struct LoggingMiddleware;

#[async_trait]
impl Middleware for LoggingMiddleware {
    async fn before(&self, event: &Event) -> Result<bool> {
        match &event.payload {
            EventPayload::Text { content } => {
                info!(
                    user_id = event.user.id,
                    chat_id = event.chat.id,
                    content = %content,
                    "Received message"
                );
            }
            EventPayload::Callback { data, .. } => {
                info!(
                    user_id = event.user.id,
                    chat_id = event.chat.id,
                    data = %data,
                    "Received callback"
                );
            }
        }
        Ok(true)
    }

    async fn after(&self, event: &Event, outcome: &Outcome) -> Result<()> {
        debug!(
            user_id = event.user.id,
            outcome = ?outcome,
            "Event processed"
        );
        Ok(())
    }
}
