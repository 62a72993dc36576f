//! `/admin` and the admin callback menus: panel list, per-panel inbounds,
//! and the free-trial switch.

use std::sync::Arc;

use async_trait::async_trait;
use panel_client::connect;
use panelbot_core::{Bot, Button, Event, Handler, Keyboard, Outcome, Result};
use storage::Database;
use tracing::{info, warn};

use super::{db_err, is_admin};
use crate::config::BotConfig;
use crate::session::SessionStore;

/// Panel list with per-panel open/delete buttons. `edit_in_place` reuses the
/// pressed menu; commands send a fresh message.
pub(crate) async fn render_panels_menu(
    bot: &dyn Bot,
    db: &Database,
    event: &Event,
    edit_in_place: bool,
) -> Result<()> {
    let panels = db.panels.list_panels().await.map_err(db_err)?;

    let mut text = String::from("\u{1F5A5} *Panels*\n\n");
    if panels.is_empty() {
        text.push_str("No panels registered yet.");
    } else {
        for panel in &panels {
            text.push_str(&format!(
                "{}. {} ({}) - {}\n",
                panel.id, panel.name, panel.panel_type, panel.url
            ));
            if !panel.sub_base.is_empty() {
                text.push_str(&format!("    sub: {}\n", panel.sub_base));
            }
        }
    }

    let mut keyboard = Keyboard::new();
    for panel in &panels {
        keyboard = keyboard.row(vec![
            Button::callback(
                format!("\u{1F4E1} {}", panel.name),
                format!("panel_inbounds_{}", panel.id),
            ),
            Button::callback("\u{1F5D1}", format!("panel_delete_{}", panel.id)),
        ]);
    }
    keyboard = keyboard
        .row(vec![Button::callback("\u{2795} Add panel", "panel_add_start")])
        .row(vec![Button::callback("\u{1F519} Back", "admin_main")]);

    if edit_in_place {
        if let Some(message_id) = event.callback_message_id() {
            return bot.edit_menu(&event.chat, message_id, &text, &keyboard).await;
        }
    }
    bot.send_menu(&event.chat, &text, &keyboard).await.map(|_| ())
}

/// Inbound list of one panel with per-row delete buttons plus the add and
/// refresh actions.
pub(crate) async fn render_inbounds_menu(
    bot: &dyn Bot,
    db: &Database,
    event: &Event,
    panel_id: i64,
    edit_in_place: bool,
) -> Result<()> {
    let Some(panel) = db.panels.get_panel(panel_id).await.map_err(db_err)? else {
        bot.send_text(&event.chat, "Panel not found.").await?;
        return Ok(());
    };
    let inbounds = db.panels.list_inbounds(panel_id).await.map_err(db_err)?;

    let mut text = format!("\u{1F4E1} *{}* inbounds\n\n", panel.name);
    if inbounds.is_empty() {
        text.push_str("No inbounds stored for this panel.");
    } else {
        for inbound in &inbounds {
            text.push_str(&format!("- {} | {}\n", inbound.protocol, inbound.tag));
        }
    }

    let mut keyboard = Keyboard::new();
    for inbound in &inbounds {
        keyboard = keyboard.row(vec![Button::callback(
            format!("\u{1F5D1} {} | {}", inbound.protocol, inbound.tag),
            format!("inbound_delete_{}", inbound.id),
        )]);
    }
    keyboard = keyboard
        .row(vec![
            Button::callback("\u{2795} Add inbound", "inbound_add_start"),
            Button::callback("\u{1F504} Refresh from panel", "inbound_refresh"),
        ])
        .row(vec![Button::callback("\u{1F519} Back", "admin_panels_menu")]);

    if edit_in_place {
        if let Some(message_id) = event.callback_message_id() {
            return bot.edit_menu(&event.chat, message_id, &text, &keyboard).await;
        }
    }
    bot.send_menu(&event.chat, &text, &keyboard).await.map(|_| ())
}

pub struct AdminMenuHandler {
    config: BotConfig,
    db: Database,
    bot: Arc<dyn Bot>,
    sessions: SessionStore,
}

impl AdminMenuHandler {
    pub fn new(components: &crate::components::AppComponents) -> Self {
        Self {
            config: components.config.clone(),
            db: components.db.clone(),
            bot: components.bot.clone(),
            sessions: components.sessions.clone(),
        }
    }

    async fn render_admin_main(&self, event: &Event, edit_in_place: bool) -> Result<()> {
        let trial = self
            .db
            .settings
            .free_trial_enabled()
            .await
            .map_err(db_err)?;
        let text = format!(
            "\u{2699} *Admin panel*\n\nFree trial: {}",
            if trial { "on" } else { "off" }
        );
        let keyboard = Keyboard::new()
            .row(vec![Button::callback("\u{1F5A5} Panels", "admin_panels_menu")])
            .row(vec![Button::callback(
                if trial {
                    "\u{1F6AB} Disable free trial"
                } else {
                    "\u{1F381} Enable free trial"
                },
                "admin_toggle_trial",
            )])
            .row(vec![Button::callback("\u{1F519} Back", "start_main")]);

        if edit_in_place {
            if let Some(message_id) = event.callback_message_id() {
                return self
                    .bot
                    .edit_menu(&event.chat, message_id, &text, &keyboard)
                    .await;
            }
        }
        self.bot
            .send_menu(&event.chat, &text, &keyboard)
            .await
            .map(|_| ())
    }

    async fn deny(&self, event: &Event) -> Result<Outcome> {
        if let Some(id) = event.callback_id() {
            self.bot
                .answer_callback_alert(id, "You are not allowed to do that.")
                .await?;
        }
        Ok(Outcome::Stop)
    }

    async fn handle_callback(&self, event: &Event, data: &str) -> Result<Outcome> {
        let admin = is_admin(&self.config, &self.db, event.user.id).await;

        match data {
            "admin_main" => {
                if !admin {
                    return self.deny(event).await;
                }
                if let Some(id) = event.callback_id() {
                    self.bot.answer_callback(id).await?;
                }
                self.render_admin_main(event, true).await?;
                Ok(Outcome::Stop)
            }
            "admin_panels_menu" => {
                if !admin {
                    return self.deny(event).await;
                }
                if let Some(id) = event.callback_id() {
                    self.bot.answer_callback(id).await?;
                }
                render_panels_menu(self.bot.as_ref(), &self.db, event, true).await?;
                Ok(Outcome::Stop)
            }
            "admin_toggle_trial" => {
                if !admin {
                    return self.deny(event).await;
                }
                let enabled = self
                    .db
                    .settings
                    .free_trial_enabled()
                    .await
                    .map_err(db_err)?;
                self.db
                    .settings
                    .set(storage::FREE_TRIAL_KEY, if enabled { "0" } else { "1" })
                    .await
                    .map_err(db_err)?;
                info!(enabled = !enabled, "Toggled free trial");
                if let Some(id) = event.callback_id() {
                    self.bot.answer_callback(id).await?;
                }
                self.render_admin_main(event, true).await?;
                Ok(Outcome::Stop)
            }
            "inbound_refresh" => {
                if !admin {
                    return self.deny(event).await;
                }
                self.refresh_inbounds(event).await
            }
            _ if data.starts_with("panel_inbounds_") => {
                if !admin {
                    return self.deny(event).await;
                }
                let Ok(panel_id) = data.trim_start_matches("panel_inbounds_").parse::<i64>()
                else {
                    return Ok(Outcome::Continue);
                };
                self.sessions.set_editing_panel(event.user.id, panel_id).await;
                if let Some(id) = event.callback_id() {
                    self.bot.answer_callback(id).await?;
                }
                render_inbounds_menu(self.bot.as_ref(), &self.db, event, panel_id, true).await?;
                Ok(Outcome::Stop)
            }
            _ if data.starts_with("panel_delete_") => {
                if !admin {
                    return self.deny(event).await;
                }
                let Ok(panel_id) = data.trim_start_matches("panel_delete_").parse::<i64>() else {
                    return Ok(Outcome::Continue);
                };
                // Inbounds go with the panel via the cascade.
                let existed = self.db.panels.delete_panel(panel_id).await.map_err(db_err)?;
                if let Some(id) = event.callback_id() {
                    if existed {
                        self.bot.answer_callback(id).await?;
                    } else {
                        self.bot
                            .answer_callback_alert(id, "Panel not found.")
                            .await?;
                    }
                }
                render_panels_menu(self.bot.as_ref(), &self.db, event, true).await?;
                Ok(Outcome::Stop)
            }
            _ if data.starts_with("inbound_delete_") => {
                if !admin {
                    return self.deny(event).await;
                }
                let Ok(row_id) = data.trim_start_matches("inbound_delete_").parse::<i64>() else {
                    return Ok(Outcome::Continue);
                };
                self.db.panels.delete_inbound(row_id).await.map_err(db_err)?;
                if let Some(id) = event.callback_id() {
                    self.bot.answer_callback(id).await?;
                }
                match self.sessions.editing_panel(event.user.id).await {
                    Some(panel_id) => {
                        render_inbounds_menu(self.bot.as_ref(), &self.db, event, panel_id, true)
                            .await?
                    }
                    None => render_panels_menu(self.bot.as_ref(), &self.db, event, true).await?,
                }
                Ok(Outcome::Stop)
            }
            _ => Ok(Outcome::Continue),
        }
    }

    /// Re-fetches the inbound list from the panel the admin is editing and
    /// replaces the stored rows. Panels whose dialect the factory rejects
    /// report an error instead.
    async fn refresh_inbounds(&self, event: &Event) -> Result<Outcome> {
        let Some(panel_id) = self.sessions.editing_panel(event.user.id).await else {
            if let Some(id) = event.callback_id() {
                self.bot
                    .answer_callback_alert(id, "Open the panel again first.")
                    .await?;
            }
            return Ok(Outcome::Stop);
        };
        let Some(panel) = self.db.panels.get_panel(panel_id).await.map_err(db_err)? else {
            if let Some(id) = event.callback_id() {
                self.bot
                    .answer_callback_alert(id, "Panel not found.")
                    .await?;
            }
            return Ok(Outcome::Stop);
        };

        let username = panel.username.as_deref().unwrap_or_default();
        let password = panel.password.as_deref().unwrap_or_default();
        let fetched = match connect(&panel.panel_type, &panel.url, username, password) {
            Ok(client) => client.list_inbounds().await,
            Err(e) => Err(e),
        };

        match fetched {
            Ok(inbounds) => {
                let rows: Vec<(String, String, Option<i64>)> = inbounds
                    .iter()
                    .map(|i| (i.protocol_or_default(), i.stored_tag(), Some(i.id)))
                    .collect();
                let count = self
                    .db
                    .panels
                    .replace_inbounds(panel_id, &rows)
                    .await
                    .map_err(db_err)?;
                info!(panel_id, count, "Refreshed inbounds from the panel");
                if let Some(id) = event.callback_id() {
                    self.bot
                        .answer_callback_alert(
                            id,
                            &format!("Updated {} inbounds from the panel.", count),
                        )
                        .await?;
                }
                render_inbounds_menu(self.bot.as_ref(), &self.db, event, panel_id, true).await?;
            }
            Err(e) => {
                warn!(error = %e, panel_id, "Inbound refresh failed");
                if let Some(id) = event.callback_id() {
                    self.bot
                        .answer_callback_alert(id, &format!("Refresh failed: {}", e))
                        .await?;
                }
            }
        }
        Ok(Outcome::Stop)
    }
}

#[async_trait]
impl Handler for AdminMenuHandler {
    async fn handle(&self, event: &Event) -> Result<Outcome> {
        if let Some(("/admin", _)) = event.command() {
            if !is_admin(&self.config, &self.db, event.user.id).await {
                // Silent for non-admins, like an unknown command.
                return Ok(Outcome::Stop);
            }
            self.render_admin_main(event, false).await?;
            return Ok(Outcome::Stop);
        }
        match event.callback_data() {
            Some(data) => self.handle_callback(event, data).await,
            None => Ok(Outcome::Continue),
        }
    }
}
