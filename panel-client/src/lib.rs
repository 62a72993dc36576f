//! Panel client crate: HTTP clients for the VPN panel dialects the bot resells from.
//!
//! ## Modules
//!
//! - [`error`] – PanelError
//! - [`inbound`] – Inbound DTO shared by all dialects
//! - [`xui`] – XuiClient for the X-UI family (classic x-ui, 3x-ui, tx-ui)
//! - [`netico`] – NeticoClient (token-authenticated reseller panel)
//! - [`factory`] – PanelKind and the `connect` factory keyed by panel type string
//!
//! All clients implement [`PanelApi`]; callers get one from [`connect`] and
//! never care which dialect is behind it.

mod error;
mod factory;
mod inbound;
mod netico;
mod xui;

use async_trait::async_trait;

pub use error::PanelError;
pub use factory::{connect, PanelKind};
pub use inbound::Inbound;
pub use netico::NeticoClient;
pub use xui::{XuiClient, XuiFlavor};

/// Common surface of every panel dialect.
///
/// Authentication is performed lazily inside each call, so constructing a
/// client never touches the network.
#[async_trait]
pub trait PanelApi: Send + Sync + std::fmt::Debug {
    /// Logs in and fetches the panel's inbound list. An empty list is not an
    /// error; callers decide what it means.
    async fn list_inbounds(&self) -> Result<Vec<Inbound>, PanelError>;
}
