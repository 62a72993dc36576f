//! Wraps teloxide::Bot and implements [`panelbot_core::Bot`]. Production code
//! talks to Telegram through this; tests substitute a recording mock.

use async_trait::async_trait;
use panelbot_core::{
    Bot as CoreBot, BotError, ButtonAction, ChannelRef, Chat, Keyboard, MediaKind, MediaRef,
    MemberStatus, Result,
};
use teloxide::prelude::*;
use teloxide::types::{
    CallbackQueryId, ChatMemberStatus, FileId, InlineKeyboardButton, InlineKeyboardMarkup,
    InputFile, MessageId, ParseMode, Recipient,
};
use teloxide::{ApiError, RequestError};
use tracing::{debug, warn};

/// Thin wrapper around teloxide::Bot implementing the core Bot trait.
/// Messages go out with legacy-Markdown parse mode, matching the copy stored
/// in the messages table.
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }

    fn markup(keyboard: &Keyboard) -> Option<InlineKeyboardMarkup> {
        if keyboard.is_empty() {
            return None;
        }
        let mut rows = Vec::with_capacity(keyboard.rows.len());
        for row in &keyboard.rows {
            let mut out = Vec::with_capacity(row.len());
            for button in row {
                match &button.action {
                    ButtonAction::Callback(data) => {
                        out.push(InlineKeyboardButton::callback(&button.text, data));
                    }
                    ButtonAction::Url(url) => match reqwest::Url::parse(url) {
                        Ok(parsed) => out.push(InlineKeyboardButton::url(&button.text, parsed)),
                        Err(e) => {
                            warn!(error = %e, url = %url, "Skipping button with invalid URL");
                        }
                    },
                }
            }
            if !out.is_empty() {
                rows.push(out);
            }
        }
        Some(InlineKeyboardMarkup::new(rows))
    }
}

fn tg_err(e: RequestError) -> BotError {
    BotError::Telegram(e.to_string())
}

fn recipient(channel: &ChannelRef) -> Recipient {
    match channel {
        ChannelRef::Id(id) => Recipient::Id(ChatId(*id)),
        ChannelRef::Username(name) => {
            let name = name.trim_start_matches('@');
            Recipient::ChannelUsername(format!("@{}", name))
        }
    }
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_text(&self, chat: &Chat, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat.id), text)
            .parse_mode(ParseMode::Markdown)
            .await
            .map_err(tg_err)?;
        Ok(())
    }

    async fn send_menu(&self, chat: &Chat, text: &str, keyboard: &Keyboard) -> Result<i32> {
        let request = self
            .bot
            .send_message(ChatId(chat.id), text)
            .parse_mode(ParseMode::Markdown);
        let sent = match Self::markup(keyboard) {
            Some(markup) => request.reply_markup(markup).await,
            None => request.await,
        }
        .map_err(tg_err)?;
        Ok(sent.id.0)
    }

    async fn edit_menu(
        &self,
        chat: &Chat,
        message_id: i32,
        text: &str,
        keyboard: &Keyboard,
    ) -> Result<()> {
        let mut request = self
            .bot
            .edit_message_text(ChatId(chat.id), MessageId(message_id), text)
            .parse_mode(ParseMode::Markdown);
        if let Some(markup) = Self::markup(keyboard) {
            request = request.reply_markup(markup);
        }
        match request.await {
            Ok(_) => Ok(()),
            Err(RequestError::Api(ApiError::MessageNotModified)) => Ok(()),
            // Media messages cannot be edited into text; replace them.
            Err(RequestError::Api(e)) => {
                debug!(error = %e, message_id, "Edit rejected, replacing message");
                let _ = self
                    .bot
                    .delete_message(ChatId(chat.id), MessageId(message_id))
                    .await;
                self.send_menu(chat, text, keyboard).await.map(|_| ())
            }
            Err(e) => Err(tg_err(e)),
        }
    }

    async fn edit_text(&self, chat: &Chat, message_id: i32, text: &str) -> Result<()> {
        match self
            .bot
            .edit_message_text(ChatId(chat.id), MessageId(message_id), text)
            .parse_mode(ParseMode::Markdown)
            .await
        {
            Ok(_) => Ok(()),
            Err(RequestError::Api(ApiError::MessageNotModified)) => Ok(()),
            Err(e) => Err(tg_err(e)),
        }
    }

    async fn delete_message(&self, chat: &Chat, message_id: i32) -> Result<()> {
        self.bot
            .delete_message(ChatId(chat.id), MessageId(message_id))
            .await
            .map_err(tg_err)?;
        Ok(())
    }

    async fn send_media(
        &self,
        chat: &Chat,
        media: &MediaRef,
        caption: &str,
        keyboard: &Keyboard,
    ) -> Result<i32> {
        let chat_id = ChatId(chat.id);
        let file = InputFile::file_id(FileId(media.file_id.clone()));
        let markup = Self::markup(keyboard);

        let sent = match media.kind {
            MediaKind::Photo => {
                let request = self
                    .bot
                    .send_photo(chat_id, file)
                    .caption(caption)
                    .parse_mode(ParseMode::Markdown);
                match markup {
                    Some(m) => request.reply_markup(m).await,
                    None => request.await,
                }
            }
            MediaKind::Video => {
                let request = self
                    .bot
                    .send_video(chat_id, file)
                    .caption(caption)
                    .parse_mode(ParseMode::Markdown);
                match markup {
                    Some(m) => request.reply_markup(m).await,
                    None => request.await,
                }
            }
            MediaKind::Document => {
                let request = self
                    .bot
                    .send_document(chat_id, file)
                    .caption(caption)
                    .parse_mode(ParseMode::Markdown);
                match markup {
                    Some(m) => request.reply_markup(m).await,
                    None => request.await,
                }
            }
        }
        .map_err(tg_err)?;
        Ok(sent.id.0)
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<()> {
        self.bot
            .answer_callback_query(CallbackQueryId(callback_id.to_string()))
            .await
            .map_err(tg_err)?;
        Ok(())
    }

    async fn answer_callback_alert(&self, callback_id: &str, text: &str) -> Result<()> {
        self.bot
            .answer_callback_query(CallbackQueryId(callback_id.to_string()))
            .text(text)
            .show_alert(true)
            .await
            .map_err(tg_err)?;
        Ok(())
    }

    async fn chat_member_status(
        &self,
        channel: &ChannelRef,
        user_id: i64,
    ) -> Result<MemberStatus> {
        let member = self
            .bot
            .get_chat_member(recipient(channel), UserId(user_id as u64))
            .await
            .map_err(tg_err)?;
        Ok(match member.status() {
            ChatMemberStatus::Owner => MemberStatus::Creator,
            ChatMemberStatus::Administrator => MemberStatus::Administrator,
            ChatMemberStatus::Member => MemberStatus::Member,
            ChatMemberStatus::Restricted => MemberStatus::Restricted,
            ChatMemberStatus::Left => MemberStatus::Left,
            ChatMemberStatus::Banned => MemberStatus::Kicked,
        })
    }

    async fn channel_join_url(&self, channel: &ChannelRef) -> Result<Option<String>> {
        // Public channels have a stable t.me link; id-only channels would need
        // an extra getChat round trip for an invite link, which requires the
        // bot to be an admin there, so the gate falls back to its configured
        // username instead.
        Ok(match channel {
            ChannelRef::Username(name) => {
                Some(format!("https://t.me/{}", name.trim_start_matches('@')))
            }
            ChannelRef::Id(_) => None,
        })
    }
}
