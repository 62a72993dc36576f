//! Panel type parsing and the client factory.

use crate::error::PanelError;
use crate::netico::NeticoClient;
use crate::xui::{XuiClient, XuiFlavor};
use crate::PanelApi;

/// Canonical panel dialect, parsed from the free-form `panel_type` strings
/// operators register panels with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    Xui,
    ThreeXui,
    TxUi,
    Netico,
}

impl PanelKind {
    /// Case-insensitive parse of every accepted alias. Unknown strings return
    /// None so callers can report the type as unsupported.
    pub fn parse(panel_type: &str) -> Option<Self> {
        match panel_type.trim().to_lowercase().as_str() {
            "xui" | "x-ui" | "alireza" | "sanaei" => Some(Self::Xui),
            "3xui" | "3x-ui" => Some(Self::ThreeXui),
            "txui" | "tx-ui" | "tx ui" => Some(Self::TxUi),
            "netico" => Some(Self::Netico),
            _ => None,
        }
    }

    /// X-UI-lineage panels carry a subscription base URL; Netico does not.
    pub fn uses_sub_base(&self) -> bool {
        matches!(self, Self::Xui | Self::ThreeXui | Self::TxUi)
    }
}

/// Builds the dialect client for a registered panel. Fails fast on an
/// unsupported type string; no network traffic happens here.
pub fn connect(
    panel_type: &str,
    url: &str,
    username: &str,
    password: &str,
) -> Result<Box<dyn PanelApi>, PanelError> {
    let kind = PanelKind::parse(panel_type)
        .ok_or_else(|| PanelError::UnsupportedType(panel_type.to_string()))?;

    Ok(match kind {
        PanelKind::Xui => Box::new(XuiClient::new(url, username, password, XuiFlavor::Classic)?),
        PanelKind::ThreeXui => Box::new(XuiClient::new(url, username, password, XuiFlavor::ThreeX)?),
        PanelKind::TxUi => Box::new(XuiClient::new(url, username, password, XuiFlavor::TxUi)?),
        PanelKind::Netico => Box::new(NeticoClient::new(url, username, password)?),
    })
}
