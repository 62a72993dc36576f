//! Bot abstraction for sending, editing, and answering messages.
//!
//! [`Bot`] is transport-agnostic; the application provides a teloxide-backed
//! implementation. Tests substitute a recording mock.

use crate::error::Result;
use crate::types::Chat;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One inline-keyboard button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub text: String,
    pub action: ButtonAction,
}

/// What pressing a button does: fire a callback or open a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonAction {
    Callback(String),
    Url(String),
}

impl Button {
    /// Callback button with the given label and callback data.
    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: ButtonAction::Callback(data.into()),
        }
    }

    /// URL button with the given label and link.
    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: ButtonAction::Url(url.into()),
        }
    }
}

/// Inline keyboard as rows of buttons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Appends a row of buttons.
    pub fn row(mut self, buttons: Vec<Button>) -> Self {
        self.rows.push(buttons);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Callback data of every callback button, row by row. Used by tests and
    /// by the start-menu builder to detect already-present targets.
    pub fn callback_targets(&self) -> Vec<&str> {
        self.rows
            .iter()
            .flatten()
            .filter_map(|b| match &b.action {
                ButtonAction::Callback(data) => Some(data.as_str()),
                ButtonAction::Url(_) => None,
            })
            .collect()
    }
}

/// Media attachment stored by Telegram file id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub file_id: String,
    pub kind: MediaKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Photo,
    Video,
    Document,
}

impl MediaKind {
    /// Parses the `file_type` column value ("photo", "video", "document").
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "photo" => Some(Self::Photo),
            "video" => Some(Self::Video),
            "document" => Some(Self::Document),
            _ => None,
        }
    }
}

/// Membership status of a user in a channel, as reported by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberStatus {
    Creator,
    Administrator,
    Member,
    Restricted,
    Left,
    Kicked,
}

impl MemberStatus {
    /// True for the statuses that count as having joined the channel.
    pub fn is_joined(&self) -> bool {
        matches!(self, Self::Member | Self::Administrator | Self::Creator)
    }
}

/// Channel reference: numeric chat id or public username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelRef {
    Id(i64),
    Username(String),
}

/// Abstraction over the messaging transport. Implementations map to Telegram.
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a plain text message to the given chat.
    async fn send_text(&self, chat: &Chat, text: &str) -> Result<()>;

    /// Sends a text message with an inline keyboard; returns the message id.
    async fn send_menu(&self, chat: &Chat, text: &str, keyboard: &Keyboard) -> Result<i32>;

    /// Edits an already-sent message's text and keyboard in place.
    /// "Message is not modified" is not an error.
    async fn edit_menu(
        &self,
        chat: &Chat,
        message_id: i32,
        text: &str,
        keyboard: &Keyboard,
    ) -> Result<()>;

    /// Edits an already-sent message's text, dropping any keyboard.
    async fn edit_text(&self, chat: &Chat, message_id: i32, text: &str) -> Result<()>;

    /// Deletes a message. Failures are reported, callers usually ignore them.
    async fn delete_message(&self, chat: &Chat, message_id: i32) -> Result<()>;

    /// Sends a media message (photo/video/document by file id) with caption
    /// and keyboard; returns the message id.
    async fn send_media(
        &self,
        chat: &Chat,
        media: &MediaRef,
        caption: &str,
        keyboard: &Keyboard,
    ) -> Result<i32>;

    /// Acknowledges a callback query (clears the client-side spinner).
    async fn answer_callback(&self, callback_id: &str) -> Result<()>;

    /// Acknowledges a callback query with an alert popup.
    async fn answer_callback_alert(&self, callback_id: &str, text: &str) -> Result<()>;

    /// Looks up the user's membership status in the given channel.
    async fn chat_member_status(&self, channel: &ChannelRef, user_id: i64)
        -> Result<MemberStatus>;

    /// Resolves a join URL for the channel: `https://t.me/<username>` when the
    /// channel is public, otherwise its invite link if one exists.
    async fn channel_join_url(&self, channel: &ChannelRef) -> Result<Option<String>>;
}
