//! Conversions from teloxide update types to core events.

use chrono::Utc;
use panelbot_core::{Chat, Event, EventPayload, ToCoreEvent, ToCoreUser, User};
use uuid::Uuid;

/// Telegram user to core user.
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> ToCoreUser for TelegramUserWrapper<'a> {
    fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            first_name: Some(self.0.first_name.clone()),
            last_name: self.0.last_name.clone(),
        }
    }
}

fn anonymous_user(chat_id: i64) -> User {
    User {
        id: chat_id,
        username: None,
        first_name: None,
        last_name: None,
    }
}

/// Telegram message to a core text event.
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> ToCoreEvent for TelegramMessageWrapper<'a> {
    fn to_core(&self) -> Event {
        let chat = Chat {
            id: self.0.chat.id.0,
            chat_type: format!("{:?}", self.0.chat.kind),
        };
        Event {
            id: Uuid::new_v4().to_string(),
            user: self
                .0
                .from
                .as_ref()
                .map(|u| TelegramUserWrapper(u).to_core())
                .unwrap_or_else(|| anonymous_user(chat.id)),
            chat,
            payload: EventPayload::Text {
                content: self.0.text().unwrap_or("").to_string(),
            },
            created_at: Utc::now(),
        }
    }
}

/// Telegram callback query to a core callback event. Queries without data
/// convert to an empty data string; nothing matches it and the fallback
/// handler answers it.
pub struct TelegramCallbackWrapper<'a>(pub &'a teloxide::types::CallbackQuery);

impl<'a> ToCoreEvent for TelegramCallbackWrapper<'a> {
    fn to_core(&self) -> Event {
        let user = TelegramUserWrapper(&self.0.from).to_core();
        let chat = self
            .0
            .message
            .as_ref()
            .map(|m| Chat {
                id: m.chat().id.0,
                chat_type: format!("{:?}", m.chat().kind),
            })
            // Callbacks from detached keyboards still belong to the private
            // chat, whose id equals the user id.
            .unwrap_or_else(|| Chat {
                id: user.id,
                chat_type: "Private".to_string(),
            });
        Event {
            id: Uuid::new_v4().to_string(),
            user,
            chat,
            payload: EventPayload::Callback {
                data: self.0.data.clone().unwrap_or_default(),
                callback_id: self.0.id.0.clone(),
                message_id: self.0.message.as_ref().map(|m| m.id().0),
            },
            created_at: Utc::now(),
        }
    }
}
