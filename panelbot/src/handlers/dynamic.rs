//! Database-driven menus: any callback whose data names a `messages` row is
//! rendered from that row, so operators add whole menu trees without code
//! changes.

use std::sync::Arc;

use async_trait::async_trait;
use panelbot_core::{Bot, Button, Event, Handler, MediaKind, MediaRef, Outcome, Result};
use storage::Database;
use tracing::{debug, warn};

use super::db_err;
use crate::keyboards::{build_start_menu_keyboard, layout_buttons};

const START_MENU: &str = "start_main";

/// Renders one dynamic message to the event's chat.
///
/// Text content edits the pressed menu in place; media content replaces it,
/// since Telegram cannot edit a text message into a media one. `back_to` adds
/// a back button pointing at another menu (the start menu renders its own
/// keyboard and never gets one).
pub async fn send_dynamic_message(
    bot: &dyn Bot,
    db: &Database,
    event: &Event,
    message_name: &str,
    back_to: Option<&str>,
) -> Result<()> {
    let Some(message) = db.menus.get_message(message_name).await.map_err(db_err)? else {
        let text = format!("Content '{}' not found!", message_name);
        match event.callback_id() {
            Some(id) => bot.answer_callback_alert(id, &text).await?,
            None => bot.send_text(&event.chat, &text).await?,
        }
        return Ok(());
    };

    let buttons = db.menus.list_buttons(message_name).await.map_err(db_err)?;
    let keyboard = if message_name == START_MENU {
        let trial = db.settings.free_trial_enabled().await.map_err(db_err)?;
        build_start_menu_keyboard(&buttons, trial)
    } else {
        let mut keyboard = layout_buttons(&buttons);
        if let Some(target) = back_to {
            keyboard = keyboard.row(vec![Button::callback("\u{1F519} Back", target)]);
        }
        keyboard
    };

    let text = message.text.unwrap_or_default();
    let media = message
        .file_id
        .as_ref()
        .zip(message.file_type.as_deref().and_then(MediaKind::parse))
        .map(|(file_id, kind)| MediaRef {
            file_id: file_id.clone(),
            kind,
        });

    if let Some(media) = media {
        if let Some(message_id) = event.callback_message_id() {
            if let Err(e) = bot.delete_message(&event.chat, message_id).await {
                warn!(error = %e, message_id, "Could not delete the previous menu");
            }
        }
        bot.send_media(&event.chat, &media, &text, &keyboard).await?;
        return Ok(());
    }

    match event.callback_message_id() {
        Some(message_id) => bot.edit_menu(&event.chat, message_id, &text, &keyboard).await,
        None => bot.send_menu(&event.chat, &text, &keyboard).await.map(|_| ()),
    }
}

/// Resolves callback data against the `messages` table. Unknown names fall
/// through to the next handler.
pub struct DynamicMenuHandler {
    db: Database,
    bot: Arc<dyn Bot>,
}

impl DynamicMenuHandler {
    pub fn new(components: &crate::components::AppComponents) -> Self {
        Self {
            db: components.db.clone(),
            bot: components.bot.clone(),
        }
    }
}

#[async_trait]
impl Handler for DynamicMenuHandler {
    async fn handle(&self, event: &Event) -> Result<Outcome> {
        let Some(data) = event.callback_data() else {
            return Ok(Outcome::Continue);
        };
        if self
            .db
            .menus
            .get_message(data)
            .await
            .map_err(db_err)?
            .is_none()
        {
            return Ok(Outcome::Continue);
        }

        debug!(menu = %data, user_id = event.user.id, "Rendering dynamic menu");
        if let Some(id) = event.callback_id() {
            self.bot.answer_callback(id).await?;
        }
        let back_to = (data != START_MENU).then_some(START_MENU);
        send_dynamic_message(self.bot.as_ref(), &self.db, event, data, back_to).await?;
        Ok(Outcome::Stop)
    }
}
