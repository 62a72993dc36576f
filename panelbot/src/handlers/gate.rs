//! Channel-membership gate: middleware that blocks non-members, and the
//! `check_join` handler that lets them back in.

use std::sync::Arc;

use async_trait::async_trait;
use panelbot_core::{
    Bot, ChannelRef, Event, EventPayload, Handler, Middleware, Outcome, Result,
};
use storage::Database;
use tracing::{info, warn};

use super::{is_admin, start::render_start_menu};
use crate::config::BotConfig;
use crate::keyboards::join_gate_keyboard;
use crate::session::SessionStore;

const LOCK_TEXT: &str =
    "\u{26A0}\u{FE0F} *Membership required*\n\nJoin our channel first, then press \"I joined\".";

/// Runs before every handler when a channel is configured. Admins bypass;
/// referral payloads are captured before blocking; users inside an active
/// conversation are not re-checked so text inputs are never swallowed
/// mid-flow. Membership lookup errors fail closed.
pub struct JoinGateMiddleware {
    config: BotConfig,
    db: Database,
    bot: Arc<dyn Bot>,
    sessions: SessionStore,
}

impl JoinGateMiddleware {
    pub fn new(components: &crate::components::AppComponents) -> Self {
        Self {
            config: components.config.clone(),
            db: components.db.clone(),
            bot: components.bot.clone(),
            sessions: components.sessions.clone(),
        }
    }

    async fn join_url(&self, channel: &ChannelRef) -> Option<String> {
        if let Ok(Some(url)) = self.bot.channel_join_url(channel).await {
            return Some(url);
        }
        self.config
            .channel_username
            .as_ref()
            .map(|u| format!("https://t.me/{}", u.trim_start_matches('@')))
    }

    fn lock_text(&self) -> String {
        match &self.config.channel_username {
            Some(name) => format!("{}\n\nChannel: @{}", LOCK_TEXT, name.trim_start_matches('@')),
            None => LOCK_TEXT.to_string(),
        }
    }
}

#[async_trait]
impl Middleware for JoinGateMiddleware {
    async fn before(&self, event: &Event) -> Result<bool> {
        let Some(channel) = self.config.channel() else {
            return Ok(true);
        };
        let user_id = event.user.id;

        if is_admin(&self.config, &self.db, user_id).await {
            return Ok(true);
        }

        // Referral payloads must survive the gate.
        if let Some(("/start", Some(arg))) = event.command() {
            if let Ok(referrer_id) = arg.parse::<i64>() {
                if referrer_id != user_id {
                    self.sessions.set_referrer(user_id, referrer_id).await;
                }
            }
        }

        if self.sessions.in_conversation(user_id).await {
            return Ok(true);
        }

        match self.bot.chat_member_status(&channel, user_id).await {
            Ok(status) if status.is_joined() => return Ok(true),
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, user_id, "Could not check channel membership");
            }
        }

        info!(user_id, "Blocking user behind the join gate");
        let keyboard = join_gate_keyboard(self.join_url(&channel).await.as_deref());
        let text = self.lock_text();
        match &event.payload {
            EventPayload::Callback {
                callback_id,
                message_id,
                ..
            } => {
                match message_id {
                    Some(mid) => {
                        self.bot.edit_menu(&event.chat, *mid, &text, &keyboard).await?
                    }
                    None => {
                        self.bot.send_menu(&event.chat, &text, &keyboard).await?;
                    }
                }
                self.bot
                    .answer_callback_alert(callback_id, "You have not joined the channel yet!")
                    .await?;
            }
            EventPayload::Text { .. } => {
                self.bot.send_menu(&event.chat, &text, &keyboard).await?;
            }
        }
        Ok(false)
    }
}

/// `check_join`: the user claims they joined. Re-check and either replace the
/// lock message with the start menu or alert again.
pub struct CheckJoinHandler {
    config: BotConfig,
    db: Database,
    bot: Arc<dyn Bot>,
}

impl CheckJoinHandler {
    pub fn new(components: &crate::components::AppComponents) -> Self {
        Self {
            config: components.config.clone(),
            db: components.db.clone(),
            bot: components.bot.clone(),
        }
    }
}

#[async_trait]
impl Handler for CheckJoinHandler {
    async fn handle(&self, event: &Event) -> Result<Outcome> {
        if event.callback_data() != Some("check_join") {
            return Ok(Outcome::Continue);
        }

        if let Some(channel) = self.config.channel() {
            let joined = match self.bot.chat_member_status(&channel, event.user.id).await {
                Ok(status) => status.is_joined(),
                Err(e) => {
                    warn!(error = %e, user_id = event.user.id, "Membership re-check failed");
                    false
                }
            };
            if !joined {
                if let Some(id) = event.callback_id() {
                    self.bot
                        .answer_callback_alert(id, "You have not joined yet.")
                        .await?;
                }
                return Ok(Outcome::Stop);
            }
        }

        if let Some(id) = event.callback_id() {
            self.bot.answer_callback(id).await?;
        }
        info!(user_id = event.user.id, "User passed the join gate");
        render_start_menu(self.bot.as_ref(), &self.db, event, true).await?;
        Ok(Outcome::Stop)
    }
}
