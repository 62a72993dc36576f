//! Dynamic menu models: message bodies and their inline buttons.

use serde::{Deserialize, Serialize};

/// Content of a dynamic menu, keyed by `message_name`.
///
/// When `file_id`/`file_type` are set the menu is sent as a media message
/// with `text` as the caption.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MenuMessage {
    pub message_name: String,
    pub text: Option<String>,
    pub file_id: Option<String>,
    pub file_type: Option<String>,
}

/// One button of a dynamic menu, positioned on a 1-based grid.
///
/// `target` is callback data, or a URL when `is_url` is set.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MenuButton {
    pub id: i64,
    pub menu_name: String,
    pub text: String,
    pub target: String,
    pub is_url: bool,
    pub row: i64,
    pub col: i64,
}
