//! # panelbot-core
//!
//! Core types and traits for the VPN reseller bot: [`Bot`], [`Handler`], [`Middleware`],
//! event and user types, keyboards, and tracing initialization. Transport-agnostic;
//! used by handler-chain and the panelbot application.

pub mod bot;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::{Bot, Button, ButtonAction, ChannelRef, Keyboard, MediaKind, MediaRef, MemberStatus};
pub use error::{BotError, Result};
pub use logger::init_tracing;
pub use types::{
    Chat, Event, EventPayload, Handler, Middleware, Outcome, ToCoreEvent, ToCoreUser, User,
};
