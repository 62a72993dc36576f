//! Admin registration dialogues: panel registration (name, dialect, URL,
//! credentials, default inbound) and manual inbound entry.
//!
//! Each step stores the answer in the session and prompts for the next field;
//! the password step is the only one that talks to the panel.

use std::sync::Arc;

use async_trait::async_trait;
use panel_client::{connect, PanelKind};
use panelbot_core::{Bot, Event, EventPayload, Handler, Keyboard, Outcome, Result};
use storage::{Database, NewPanel};
use tracing::{info, warn};

use super::admin::render_inbounds_menu;
use super::is_admin;
use crate::config::BotConfig;
use crate::keyboards::{inbound_picker_keyboard, panel_type_keyboard};
use crate::session::{Conversation, PanelDraft, SessionStore};

/// Prefixes a scheme when the admin typed a bare host, and strips the
/// trailing slash panels are commonly pasted with.
fn normalize_url(input: &str, default_scheme: &str) -> String {
    let trimmed = input.trim().trim_end_matches('/');
    if trimmed.is_empty() || trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("{}://{}", default_scheme, trimmed)
    }
}

fn panel_type_from_callback(data: &str) -> Option<&'static str> {
    match data {
        "panel_type_xui" => Some("xui"),
        "panel_type_3xui" => Some("3x-ui"),
        "panel_type_txui" => Some("tx-ui"),
        "panel_type_netico" => Some("netico"),
        _ => None,
    }
}

pub struct ConversationHandler {
    config: BotConfig,
    db: Database,
    bot: Arc<dyn Bot>,
    sessions: SessionStore,
}

impl ConversationHandler {
    pub fn new(components: &crate::components::AppComponents) -> Self {
        Self {
            config: components.config.clone(),
            db: components.db.clone(),
            bot: components.bot.clone(),
            sessions: components.sessions.clone(),
        }
    }

    /// Replaces the pressed menu with a plain-text prompt, or sends one when
    /// the callback has no reachable message.
    async fn prompt(&self, event: &Event, text: &str) -> Result<()> {
        if let Some(message_id) = event.callback_message_id() {
            self.bot.edit_text(&event.chat, message_id, text).await
        } else {
            self.bot.send_text(&event.chat, text).await
        }
    }

    async fn handle_callback(&self, event: &Event, data: &str) -> Result<Outcome> {
        let user_id = event.user.id;

        match data {
            "panel_add_start" => {
                if !is_admin(&self.config, &self.db, user_id).await {
                    if let Some(id) = event.callback_id() {
                        self.bot
                            .answer_callback_alert(id, "You are not allowed to do that.")
                            .await?;
                    }
                    return Ok(Outcome::Stop);
                }
                // A fresh flow invalidates whatever dialogue was in progress.
                self.sessions
                    .set_conversation(user_id, Conversation::PanelAwaitName(PanelDraft::default()))
                    .await;
                if let Some(id) = event.callback_id() {
                    self.bot.answer_callback(id).await?;
                }
                self.prompt(event, "Enter a name for the panel (e.g. Germany 1):")
                    .await?;
                Ok(Outcome::Stop)
            }
            "inbound_add_start" => {
                if !is_admin(&self.config, &self.db, user_id).await {
                    if let Some(id) = event.callback_id() {
                        self.bot
                            .answer_callback_alert(id, "You are not allowed to do that.")
                            .await?;
                    }
                    return Ok(Outcome::Stop);
                }
                if let Some(id) = event.callback_id() {
                    self.bot.answer_callback(id).await?;
                }
                if self.sessions.editing_panel(user_id).await.is_none() {
                    self.prompt(event, "Panel id not found. Open the panel again.")
                        .await?;
                    return Ok(Outcome::Stop);
                }
                self.sessions
                    .set_conversation(user_id, Conversation::InboundAwaitProtocol)
                    .await;
                self.prompt(
                    event,
                    "Enter the inbound protocol (e.g. vless, vmess, trojan):",
                )
                .await?;
                Ok(Outcome::Stop)
            }
            "cancel" => {
                if self.sessions.get(user_id).await.conversation.is_none() {
                    return Ok(Outcome::Continue);
                }
                self.sessions.clear_conversation(user_id).await;
                if let Some(id) = event.callback_id() {
                    self.bot.answer_callback(id).await?;
                }
                self.prompt(event, "Operation cancelled.").await?;
                Ok(Outcome::Stop)
            }
            _ if data.starts_with("panel_type_") => self.pick_panel_type(event, data).await,
            _ if data.starts_with("panel_inbound_") => self.pick_default_inbound(event, data).await,
            _ => Ok(Outcome::Continue),
        }
    }

    async fn pick_panel_type(&self, event: &Event, data: &str) -> Result<Outcome> {
        let user_id = event.user.id;
        let Some(Conversation::PanelAwaitType(mut draft)) =
            self.sessions.get(user_id).await.conversation
        else {
            return Ok(Outcome::Continue);
        };
        let Some(panel_type) = panel_type_from_callback(data) else {
            return Ok(Outcome::Continue);
        };

        draft.panel_type = panel_type.to_string();
        if let Some(id) = event.callback_id() {
            self.bot.answer_callback(id).await?;
        }
        self.prompt(
            event,
            "Enter the full panel URL\n\
             - example: https://panel.example.com:2053\n\
             - https:// is assumed when no scheme is given",
        )
        .await?;
        self.sessions
            .set_conversation(user_id, Conversation::PanelAwaitUrl(draft))
            .await;
        Ok(Outcome::Stop)
    }

    async fn pick_default_inbound(&self, event: &Event, data: &str) -> Result<Outcome> {
        let user_id = event.user.id;
        // "panel_inbounds_N" (the admin menu) shares this prefix; only a bare
        // numeric suffix belongs to the picker.
        let Some(Ok(wanted)) = data
            .strip_prefix("panel_inbound_")
            .map(str::parse::<i64>)
        else {
            return Ok(Outcome::Continue);
        };
        let Some(Conversation::PanelAwaitDefaultInbound { draft, inbounds }) =
            self.sessions.get(user_id).await.conversation
        else {
            return Ok(Outcome::Continue);
        };
        if let Some(id) = event.callback_id() {
            self.bot.answer_callback(id).await?;
        }

        let Some(inbound) = inbounds.iter().find(|i| i.id == wanted) else {
            self.prompt(event, "Selected inbound not found. Please try again.")
                .await?;
            self.sessions.reset(user_id).await;
            return Ok(Outcome::Stop);
        };

        let panel = NewPanel {
            name: draft.name.clone(),
            panel_type: draft.panel_type.clone(),
            url: draft.url.clone(),
            sub_base: draft.sub_base.clone(),
            token: String::new(),
            username: Some(draft.username.clone()),
            password: Some(draft.password.clone()),
        };
        match self.db.panels.insert_panel(&panel).await {
            Ok(panel_id) => {
                let insert = self
                    .db
                    .panels
                    .insert_inbound(
                        panel_id,
                        &inbound.protocol_or_default(),
                        &inbound.stored_tag(),
                        Some(inbound.id),
                    )
                    .await;
                match insert {
                    Ok(_) => {
                        info!(panel_id, user_id, "Registered panel with default inbound");
                        self.prompt(event, "\u{2705} Panel and default inbound saved.")
                            .await?;
                    }
                    Err(e) => {
                        // No orphan panels.
                        warn!(error = %e, panel_id, "Default inbound insert failed, rolling back panel");
                        let _ = self.db.panels.delete_panel(panel_id).await;
                        self.prompt(
                            event,
                            "Failed to save the default inbound. The panel was removed.",
                        )
                        .await?;
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, user_id, "Panel insert failed");
                self.prompt(event, "Failed to save the panel.").await?;
            }
        }
        self.sessions.reset(user_id).await;
        Ok(Outcome::Stop)
    }

    async fn handle_text(&self, event: &Event, content: &str) -> Result<Outcome> {
        // Commands always fall through to their own handlers.
        if content.trim_start().starts_with('/') {
            return Ok(Outcome::Continue);
        }
        let user_id = event.user.id;
        let Some(conversation) = self.sessions.get(user_id).await.conversation else {
            return Ok(Outcome::Continue);
        };
        let text = content.trim();

        match conversation {
            Conversation::PanelAwaitName(mut draft) => {
                draft.name = text.to_string();
                self.bot
                    .send_menu(&event.chat, "Select the panel dialect:", &panel_type_keyboard())
                    .await?;
                self.sessions
                    .set_conversation(user_id, Conversation::PanelAwaitType(draft))
                    .await;
            }
            Conversation::PanelAwaitType(_) | Conversation::PanelAwaitDefaultInbound { .. } => {
                self.bot
                    .send_text(&event.chat, "Use the buttons above to continue.")
                    .await?;
            }
            Conversation::PanelAwaitUrl(mut draft) => {
                draft.url = normalize_url(text, "https");
                let needs_sub_base = PanelKind::parse(&draft.panel_type)
                    .map(|k| k.uses_sub_base())
                    .unwrap_or(false);
                if needs_sub_base {
                    self.bot
                        .send_text(
                            &event.chat,
                            "Enter the subscription base URL (http:// is assumed when no scheme is given):",
                        )
                        .await?;
                    self.sessions
                        .set_conversation(user_id, Conversation::PanelAwaitSubBase(draft))
                        .await;
                } else {
                    self.bot
                        .send_text(&event.chat, "Enter the panel admin username:")
                        .await?;
                    self.sessions
                        .set_conversation(user_id, Conversation::PanelAwaitUser(draft))
                        .await;
                }
            }
            Conversation::PanelAwaitSubBase(mut draft) => {
                draft.sub_base = normalize_url(text, "http");
                self.bot
                    .send_text(&event.chat, "Enter the panel admin username:")
                    .await?;
                self.sessions
                    .set_conversation(user_id, Conversation::PanelAwaitUser(draft))
                    .await;
            }
            Conversation::PanelAwaitUser(mut draft) => {
                draft.username = text.to_string();
                self.bot
                    .send_text(&event.chat, "Enter the panel password:")
                    .await?;
                self.sessions
                    .set_conversation(user_id, Conversation::PanelAwaitPass(draft))
                    .await;
            }
            Conversation::PanelAwaitPass(mut draft) => {
                draft.password = text.to_string();
                self.try_panel_login(event, draft).await?;
            }
            Conversation::InboundAwaitProtocol => {
                let protocol = text.to_lowercase();
                self.bot
                    .send_text(&event.chat, "Now enter the exact inbound tag:")
                    .await?;
                self.sessions
                    .set_conversation(user_id, Conversation::InboundAwaitTag { protocol })
                    .await;
            }
            Conversation::InboundAwaitTag { protocol } => {
                self.finish_manual_inbound(event, &protocol, text).await?;
            }
        }
        Ok(Outcome::Stop)
    }

    /// Password received: log in to the panel and offer its inbounds as the
    /// default-inbound picker. Any failure ends the flow.
    async fn try_panel_login(&self, event: &Event, draft: PanelDraft) -> Result<()> {
        let user_id = event.user.id;
        let status_id = self
            .bot
            .send_menu(
                &event.chat,
                "Connecting to the panel and fetching inbounds...",
                &Keyboard::new(),
            )
            .await?;

        let client = match connect(&draft.panel_type, &draft.url, &draft.username, &draft.password)
        {
            Ok(client) => client,
            Err(e) => {
                self.bot
                    .edit_text(&event.chat, status_id, &format!("Failed to connect: {}", e))
                    .await?;
                self.sessions.clear_conversation(user_id).await;
                return Ok(());
            }
        };

        match client.list_inbounds().await {
            Ok(inbounds) if !inbounds.is_empty() => {
                let mut text =
                    String::from("Connected. Pick the default inbound for new services:\n\n");
                for inbound in &inbounds {
                    text.push_str(&format!("- {}\n", inbound.display_name()));
                }
                let keyboard = inbound_picker_keyboard(&inbounds);
                self.bot
                    .edit_menu(&event.chat, status_id, &text, &keyboard)
                    .await?;
                self.sessions
                    .set_conversation(
                        user_id,
                        Conversation::PanelAwaitDefaultInbound { draft, inbounds },
                    )
                    .await;
            }
            Ok(_) => {
                self.bot
                    .edit_text(
                        &event.chat,
                        status_id,
                        "Failed to fetch inbounds: the panel returned an empty list.",
                    )
                    .await?;
                self.sessions.clear_conversation(user_id).await;
            }
            Err(e) => {
                warn!(error = %e, user_id, "Inbound fetch failed during registration");
                self.bot
                    .edit_text(
                        &event.chat,
                        status_id,
                        &format!("Failed to fetch inbounds: {}", e),
                    )
                    .await?;
                self.sessions.clear_conversation(user_id).await;
            }
        }
        Ok(())
    }

    async fn finish_manual_inbound(
        &self,
        event: &Event,
        protocol: &str,
        tag: &str,
    ) -> Result<()> {
        let user_id = event.user.id;
        self.sessions.clear_conversation(user_id).await;

        let Some(panel_id) = self.sessions.editing_panel(user_id).await else {
            self.bot
                .send_text(&event.chat, "Panel id not found. Open the panel again.")
                .await?;
            return Ok(());
        };
        match self
            .db
            .panels
            .insert_inbound(panel_id, protocol, tag, None)
            .await
        {
            Ok(_) => {
                info!(panel_id, protocol, tag, "Added manual inbound");
                self.bot
                    .send_text(&event.chat, "\u{2705} Inbound added.")
                    .await?;
            }
            Err(e) => {
                warn!(error = %e, panel_id, "Manual inbound insert failed");
                self.bot
                    .send_text(&event.chat, &format!("\u{274C} Failed to save: {}", e))
                    .await?;
            }
        }
        render_inbounds_menu(self.bot.as_ref(), &self.db, event, panel_id, false).await
    }
}

#[async_trait]
impl Handler for ConversationHandler {
    async fn handle(&self, event: &Event) -> Result<Outcome> {
        match &event.payload {
            EventPayload::Callback { data, .. } => self.handle_callback(event, data).await,
            EventPayload::Text { content } => self.handle_text(event, content).await,
        }
    }
}
