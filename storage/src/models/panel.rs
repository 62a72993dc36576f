//! Panel and inbound models.
//!
//! Map to the `panels` and `panel_inbounds` tables; used by PanelRepository.

use serde::{Deserialize, Serialize};

/// A registered VPN panel.
///
/// `panel_type` is the vendor dialect string as entered at registration
/// (e.g. `xui`, `3x-ui`, `txui`, `netico`); `sub_base` is the subscription
/// base URL used by X-UI-family panels and empty otherwise.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PanelRecord {
    pub id: i64,
    pub name: String,
    pub panel_type: String,
    pub url: String,
    pub sub_base: String,
    pub token: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Fields for inserting a panel; the id is assigned by the database.
#[derive(Debug, Clone)]
pub struct NewPanel {
    pub name: String,
    pub panel_type: String,
    pub url: String,
    pub sub_base: String,
    pub token: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// An inbound attached to a panel.
///
/// `inbound_id` is the vendor-side inbound id when the row came from the
/// panel's API; manually entered inbounds leave it NULL.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct InboundRecord {
    pub id: i64,
    pub panel_id: i64,
    pub protocol: String,
    pub tag: String,
    pub inbound_id: Option<i64>,
}
