//! Inbound DTO shared by all panel dialects.

use serde::Deserialize;

/// One inbound as reported by a panel. Unknown vendor fields are ignored;
/// anything missing decodes to its default so a sparse response still lists.
#[derive(Debug, Clone, Deserialize)]
pub struct Inbound {
    pub id: i64,
    #[serde(default)]
    pub remark: String,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub port: i64,
    #[serde(default)]
    pub tag: String,
}

impl Inbound {
    /// Label shown in picker keyboards: the remark, or `protocol:port` when
    /// the operator never set one.
    pub fn display_name(&self) -> String {
        if self.remark.is_empty() {
            format!("{}:{}", self.protocol, self.port)
        } else {
            self.remark.clone()
        }
    }

    /// Stored tag for the `panel_inbounds` table: remark first, then the
    /// vendor tag.
    pub fn stored_tag(&self) -> String {
        if !self.remark.is_empty() {
            self.remark.clone()
        } else {
            self.tag.clone()
        }
    }

    /// Protocol with the panels' usual default when the field is absent.
    pub fn protocol_or_default(&self) -> String {
        if self.protocol.is_empty() {
            "vless".to_string()
        } else {
            self.protocol.clone()
        }
    }
}
