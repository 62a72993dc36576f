//! Core types: user, chat, event, outcome, and the Handler/Middleware traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User identity (id, username, names).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Chat (channel or private) identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub chat_type: String,
}

/// A single incoming update with user, chat, and payload.
///
/// Text messages and callback-query button presses are folded into one type so
/// the handler chain can route both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub user: User,
    pub chat: Chat,
    pub payload: EventPayload,
    pub created_at: DateTime<Utc>,
}

/// What the user actually sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventPayload {
    /// Plain text message (commands included).
    Text { content: String },
    /// Inline-keyboard button press. `message_id` is the message the keyboard
    /// was attached to, when Telegram provides it.
    Callback {
        data: String,
        callback_id: String,
        message_id: Option<i32>,
    },
}

impl Event {
    /// Text content, if this is a text event.
    pub fn text(&self) -> Option<&str> {
        match &self.payload {
            EventPayload::Text { content } => Some(content),
            EventPayload::Callback { .. } => None,
        }
    }

    /// Callback data, if this is a callback event.
    pub fn callback_data(&self) -> Option<&str> {
        match &self.payload {
            EventPayload::Callback { data, .. } => Some(data),
            EventPayload::Text { .. } => None,
        }
    }

    /// Callback query id, if this is a callback event.
    pub fn callback_id(&self) -> Option<&str> {
        match &self.payload {
            EventPayload::Callback { callback_id, .. } => Some(callback_id),
            EventPayload::Text { .. } => None,
        }
    }

    /// Id of the message the pressed keyboard was attached to.
    pub fn callback_message_id(&self) -> Option<i32> {
        match &self.payload {
            EventPayload::Callback { message_id, .. } => *message_id,
            EventPayload::Text { .. } => None,
        }
    }

    /// Splits a `/command arg` text into the command and its argument.
    pub fn command(&self) -> Option<(&str, Option<&str>)> {
        let text = self.text()?.trim();
        if !text.starts_with('/') {
            return None;
        }
        let mut parts = text.splitn(2, char::is_whitespace);
        let cmd = parts.next()?;
        let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());
        Some((cmd, arg))
    }
}

/// Handler result for the chain. `Reply(text)` carries the response body so later handlers can use it in `after()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Pass to next handler.
    Continue,
    /// Stop the chain; no response body.
    Stop,
    /// Stop the chain and attach reply text sent to the event's chat.
    Reply(String),
}

/// Converts a transport-specific user type to core [`User`].
pub trait ToCoreUser: Send + Sync {
    fn to_core(&self) -> User;
}

/// Converts a transport-specific update type to core [`Event`].
pub trait ToCoreEvent: Send + Sync {
    fn to_core(&self) -> Event;
}

/// Single handler concept: optional before / handle / after. Chain runs all before → handle until Stop/Reply → all after (reverse).
#[async_trait]
pub trait Handler: Send + Sync {
    /// Runs before the handle phase. Return false to stop the chain.
    async fn before(&self, _event: &Event) -> crate::error::Result<bool> {
        Ok(true)
    }
    /// Processes the event. Return Stop or Reply to end the handle phase. Default: Continue.
    async fn handle(&self, _event: &Event) -> crate::error::Result<Outcome> {
        Ok(Outcome::Continue)
    }
    /// Runs after the handle phase (reverse order), with the final outcome.
    async fn after(&self, _event: &Event, _outcome: &Outcome) -> crate::error::Result<()> {
        Ok(())
    }
}

/// Cross-cutting hook around the whole handler phase. `before` returning false
/// stops the chain before any handler runs.
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn before(&self, _event: &Event) -> crate::error::Result<bool> {
        Ok(true)
    }
    async fn after(&self, _event: &Event, _outcome: &Outcome) -> crate::error::Result<()> {
        Ok(())
    }
}
