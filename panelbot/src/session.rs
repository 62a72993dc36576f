//! Per-user conversation state, kept in process memory.
//!
//! Restarting the bot drops all sessions; registration dialogues simply start
//! over, nothing persisted depends on them.

use std::collections::HashMap;
use std::sync::Arc;

use panel_client::Inbound;
use tokio::sync::RwLock;

/// Collected answers of the panel registration dialogue.
#[derive(Debug, Clone, Default)]
pub struct PanelDraft {
    pub name: String,
    pub panel_type: String,
    pub url: String,
    pub sub_base: String,
    pub username: String,
    pub password: String,
}

/// Active step of a multi-turn admin dialogue; decides how the next message
/// from that user is interpreted.
#[derive(Debug, Clone)]
pub enum Conversation {
    PanelAwaitName(PanelDraft),
    PanelAwaitType(PanelDraft),
    PanelAwaitUrl(PanelDraft),
    PanelAwaitSubBase(PanelDraft),
    PanelAwaitUser(PanelDraft),
    PanelAwaitPass(PanelDraft),
    /// The panel answered; waiting for the admin to pick the default inbound.
    PanelAwaitDefaultInbound {
        draft: PanelDraft,
        inbounds: Vec<Inbound>,
    },
    InboundAwaitProtocol,
    InboundAwaitTag { protocol: String },
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub conversation: Option<Conversation>,
    /// Referral payload captured from `/start <id>`, possibly before the join
    /// gate blocked the user.
    pub referrer_id: Option<i64>,
    /// Panel whose inbounds menu the admin last opened.
    pub editing_panel_id: Option<i64>,
}

/// Shared map of user id to [`Session`]. Cheap to clone; all clones see the
/// same sessions.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<i64, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, user_id: i64) -> Session {
        self.inner
            .read()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn set_conversation(&self, user_id: i64, conversation: Conversation) {
        self.inner
            .write()
            .await
            .entry(user_id)
            .or_default()
            .conversation = Some(conversation);
    }

    pub async fn clear_conversation(&self, user_id: i64) {
        if let Some(session) = self.inner.write().await.get_mut(&user_id) {
            session.conversation = None;
        }
    }

    pub async fn in_conversation(&self, user_id: i64) -> bool {
        self.inner
            .read()
            .await
            .get(&user_id)
            .map(|s| s.conversation.is_some())
            .unwrap_or(false)
    }

    pub async fn set_referrer(&self, user_id: i64, referrer_id: i64) {
        self.inner
            .write()
            .await
            .entry(user_id)
            .or_default()
            .referrer_id = Some(referrer_id);
    }

    pub async fn set_editing_panel(&self, user_id: i64, panel_id: i64) {
        self.inner
            .write()
            .await
            .entry(user_id)
            .or_default()
            .editing_panel_id = Some(panel_id);
    }

    pub async fn editing_panel(&self, user_id: i64) -> Option<i64> {
        self.inner
            .read()
            .await
            .get(&user_id)
            .and_then(|s| s.editing_panel_id)
    }

    /// Drops everything stored for the user. `/start` calls this.
    pub async fn reset(&self, user_id: i64) {
        self.inner.write().await.remove(&user_id);
    }
}
