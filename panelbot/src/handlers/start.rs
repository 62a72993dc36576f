//! `/start`: register the user, clear any active conversation, show the
//! landing menu.

use std::sync::Arc;

use async_trait::async_trait;
use panelbot_core::{Bot, Event, Handler, Outcome, Result};
use storage::Database;
use tracing::info;

use super::db_err;
use crate::keyboards::build_start_menu_keyboard;
use crate::session::SessionStore;

const START_MENU: &str = "start_main";
const DEFAULT_WELCOME: &str = "Welcome!";

/// Renders the start menu from the `start_main` row (default welcome when the
/// operator deleted it) with the merged DB/fallback keyboard. `edit_in_place`
/// reuses the callback's message; otherwise the old message is dropped and a
/// fresh one sent.
pub(crate) async fn render_start_menu(
    bot: &dyn Bot,
    db: &Database,
    event: &Event,
    edit_in_place: bool,
) -> Result<()> {
    let text = db
        .menus
        .get_message(START_MENU)
        .await
        .map_err(db_err)?
        .and_then(|m| m.text)
        .unwrap_or_else(|| DEFAULT_WELCOME.to_string());
    let buttons = db.menus.list_buttons(START_MENU).await.map_err(db_err)?;
    let trial = db.settings.free_trial_enabled().await.map_err(db_err)?;
    let keyboard = build_start_menu_keyboard(&buttons, trial);

    if let Some(message_id) = event.callback_message_id() {
        if edit_in_place {
            return bot.edit_menu(&event.chat, message_id, &text, &keyboard).await;
        }
        let _ = bot.delete_message(&event.chat, message_id).await;
    }
    bot.send_menu(&event.chat, &text, &keyboard).await.map(|_| ())
}

pub struct StartHandler {
    db: Database,
    bot: Arc<dyn Bot>,
    sessions: SessionStore,
}

impl StartHandler {
    pub fn new(components: &crate::components::AppComponents) -> Self {
        Self {
            db: components.db.clone(),
            bot: components.bot.clone(),
            sessions: components.sessions.clone(),
        }
    }
}

#[async_trait]
impl Handler for StartHandler {
    async fn handle(&self, event: &Event) -> Result<Outcome> {
        let Some(("/start", arg)) = event.command() else {
            return Ok(Outcome::Continue);
        };
        let user_id = event.user.id;

        // The gate may already have captured the referral before blocking.
        let referrer = arg
            .and_then(|a| a.parse::<i64>().ok())
            .filter(|r| *r != user_id)
            .or(self.sessions.get(user_id).await.referrer_id);

        self.db
            .users
            .upsert_user(
                user_id,
                event.user.username.as_deref(),
                event.user.first_name.as_deref(),
                referrer,
            )
            .await
            .map_err(db_err)?;
        info!(user_id, referrer = ?referrer, "Handled /start");

        self.sessions.reset(user_id).await;
        render_start_menu(self.bot.as_ref(), &self.db, event, false).await?;
        Ok(Outcome::Stop)
    }
}
