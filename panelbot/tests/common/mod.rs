//! Shared fixtures: a recording mock transport, event constructors, and
//! config builders.

#![allow(dead_code)]

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use panelbot::BotConfig;
use panelbot_core::{
    Bot, ChannelRef, Chat, Event, EventPayload, Keyboard, MediaRef, MemberStatus, Result, User,
};

/// One recorded transport call.
#[derive(Debug, Clone)]
pub enum Call {
    SendText {
        chat_id: i64,
        text: String,
    },
    SendMenu {
        chat_id: i64,
        text: String,
        keyboard: Keyboard,
    },
    EditMenu {
        chat_id: i64,
        message_id: i32,
        text: String,
        keyboard: Keyboard,
    },
    EditText {
        chat_id: i64,
        message_id: i32,
        text: String,
    },
    DeleteMessage {
        chat_id: i64,
        message_id: i32,
    },
    SendMedia {
        chat_id: i64,
        file_id: String,
        caption: String,
    },
    AnswerCallback {
        callback_id: String,
    },
    AnswerCallbackAlert {
        callback_id: String,
        text: String,
    },
}

/// Bot double that records every call and serves a configurable membership
/// status. Message ids count up from 100.
pub struct MockBot {
    calls: Mutex<Vec<Call>>,
    member_status: Mutex<MemberStatus>,
    next_message_id: AtomicI32,
}

impl MockBot {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            member_status: Mutex::new(MemberStatus::Left),
            next_message_id: AtomicI32::new(100),
        }
    }

    pub fn set_member_status(&self, status: MemberStatus) {
        *self.member_status.lock().unwrap() = status;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// All texts the mock would have shown the user, in call order (message
    /// bodies, captions, and alert texts).
    pub fn shown_texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::SendText { text, .. }
                | Call::SendMenu { text, .. }
                | Call::EditMenu { text, .. }
                | Call::EditText { text, .. }
                | Call::AnswerCallbackAlert { text, .. } => Some(text),
                Call::SendMedia { caption, .. } => Some(caption),
                _ => None,
            })
            .collect()
    }

    /// Keyboard of the last menu call (send or edit), if any.
    pub fn last_keyboard(&self) -> Option<Keyboard> {
        self.calls()
            .into_iter()
            .rev()
            .find_map(|c| match c {
                Call::SendMenu { keyboard, .. } | Call::EditMenu { keyboard, .. } => Some(keyboard),
                _ => None,
            })
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_id(&self) -> i32 {
        self.next_message_id.fetch_add(1, Ordering::SeqCst)
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_text(&self, chat: &Chat, text: &str) -> Result<()> {
        self.record(Call::SendText {
            chat_id: chat.id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_menu(&self, chat: &Chat, text: &str, keyboard: &Keyboard) -> Result<i32> {
        self.record(Call::SendMenu {
            chat_id: chat.id,
            text: text.to_string(),
            keyboard: keyboard.clone(),
        });
        Ok(self.next_id())
    }

    async fn edit_menu(
        &self,
        chat: &Chat,
        message_id: i32,
        text: &str,
        keyboard: &Keyboard,
    ) -> Result<()> {
        self.record(Call::EditMenu {
            chat_id: chat.id,
            message_id,
            text: text.to_string(),
            keyboard: keyboard.clone(),
        });
        Ok(())
    }

    async fn edit_text(&self, chat: &Chat, message_id: i32, text: &str) -> Result<()> {
        self.record(Call::EditText {
            chat_id: chat.id,
            message_id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn delete_message(&self, chat: &Chat, message_id: i32) -> Result<()> {
        self.record(Call::DeleteMessage {
            chat_id: chat.id,
            message_id,
        });
        Ok(())
    }

    async fn send_media(
        &self,
        chat: &Chat,
        media: &MediaRef,
        caption: &str,
        keyboard: &Keyboard,
    ) -> Result<i32> {
        let _ = keyboard;
        self.record(Call::SendMedia {
            chat_id: chat.id,
            file_id: media.file_id.clone(),
            caption: caption.to_string(),
        });
        Ok(self.next_id())
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<()> {
        self.record(Call::AnswerCallback {
            callback_id: callback_id.to_string(),
        });
        Ok(())
    }

    async fn answer_callback_alert(&self, callback_id: &str, text: &str) -> Result<()> {
        self.record(Call::AnswerCallbackAlert {
            callback_id: callback_id.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn chat_member_status(
        &self,
        _channel: &ChannelRef,
        _user_id: i64,
    ) -> Result<MemberStatus> {
        Ok(*self.member_status.lock().unwrap())
    }

    async fn channel_join_url(&self, channel: &ChannelRef) -> Result<Option<String>> {
        Ok(match channel {
            ChannelRef::Username(name) => {
                Some(format!("https://t.me/{}", name.trim_start_matches('@')))
            }
            ChannelRef::Id(_) => None,
        })
    }
}

pub fn text_event(user_id: i64, content: &str) -> Event {
    Event {
        id: format!("test-{}", user_id),
        user: User {
            id: user_id,
            username: Some(format!("user{}", user_id)),
            first_name: Some("Test".to_string()),
            last_name: None,
        },
        chat: Chat {
            id: user_id,
            chat_type: "private".to_string(),
        },
        payload: EventPayload::Text {
            content: content.to_string(),
        },
        created_at: Utc::now(),
    }
}

pub fn callback_event(user_id: i64, data: &str, message_id: Option<i32>) -> Event {
    Event {
        payload: EventPayload::Callback {
            data: data.to_string(),
            callback_id: format!("cb-{}-{}", user_id, data),
            message_id,
        },
        ..text_event(user_id, "")
    }
}

/// Config without a forced-join channel.
pub fn test_config(admin_id: i64) -> BotConfig {
    BotConfig {
        bot_token: "123:test".to_string(),
        telegram_api_url: None,
        database_url: "sqlite::memory:".to_string(),
        log_file: "logs/test.log".to_string(),
        admin_id,
        channel_id: None,
        channel_username: None,
    }
}

/// Config with a forced-join channel by numeric id.
pub fn gated_config(admin_id: i64, channel_id: i64) -> BotConfig {
    BotConfig {
        channel_id: Some(channel_id),
        channel_username: Some("testchannel".to_string()),
        ..test_config(admin_id)
    }
}
