//! Terminal handler: acknowledges callbacks nothing else claimed so the
//! client-side spinner never hangs.

use std::sync::Arc;

use async_trait::async_trait;
use panelbot_core::{Bot, Event, Handler, Outcome, Result};
use tracing::warn;

pub struct CallbackFallbackHandler {
    bot: Arc<dyn Bot>,
}

impl CallbackFallbackHandler {
    pub fn new(components: &crate::components::AppComponents) -> Self {
        Self {
            bot: components.bot.clone(),
        }
    }
}

#[async_trait]
impl Handler for CallbackFallbackHandler {
    async fn handle(&self, event: &Event) -> Result<Outcome> {
        let Some(callback_id) = event.callback_id() else {
            return Ok(Outcome::Continue);
        };
        warn!(
            data = ?event.callback_data(),
            user_id = event.user.id,
            "Unhandled callback"
        );
        self.bot.answer_callback(callback_id).await?;
        Ok(Outcome::Stop)
    }
}
