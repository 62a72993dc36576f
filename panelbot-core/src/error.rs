use thiserror::Error;

/// Failure surfaced by a handler or the transport. Storage and panel errors
/// that end a user flow are reported as chat messages instead; only the two
/// sources the chain propagates get a variant.
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Telegram error: {0}")]
    Telegram(String),
}

pub type Result<T> = std::result::Result<T, BotError>;
