//! Bot config: Telegram connection, database, logging, admin, and the
//! forced-join channel. Loaded from env.

use anyhow::Result;
use panelbot_core::ChannelRef;
use std::env;

#[derive(Debug, Clone)]
pub struct BotConfig {
    /// BOT_TOKEN
    pub bot_token: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// SQLite database URL
    pub database_url: String,
    /// Log file path
    pub log_file: String,
    /// Primary admin user id (0 when unset; extra admins live in the DB)
    pub admin_id: i64,
    /// Numeric id of the forced-join channel
    pub channel_id: Option<i64>,
    /// Public username of the forced-join channel (with or without `@`)
    pub channel_username: Option<String>,
}

impl BotConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(t) => t,
            None => env::var("BOT_TOKEN").map_err(|_| anyhow::anyhow!("BOT_TOKEN not set"))?,
        };
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:panelbot.db".to_string());
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "logs/panelbot.log".to_string());
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        let admin_id = env::var("ADMIN_ID")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0);
        let channel_id = env::var("CHANNEL_ID")
            .ok()
            .and_then(|s| s.trim().parse().ok());
        let channel_username = env::var("CHANNEL_USERNAME")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Self {
            bot_token,
            telegram_api_url,
            database_url,
            log_file,
            admin_id,
            channel_id,
            channel_username,
        })
    }

    /// Validate config (e.g. telegram_api_url must be a valid URL if set).
    pub fn validate(&self) -> Result<()> {
        if self.bot_token.trim().is_empty() {
            anyhow::bail!("BOT_TOKEN is empty");
        }
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        Ok(())
    }

    /// The forced-join channel, when one is configured. A numeric id wins over
    /// a username; neither set disables the gate.
    pub fn channel(&self) -> Option<ChannelRef> {
        if let Some(id) = self.channel_id {
            return Some(ChannelRef::Id(id));
        }
        self.channel_username
            .as_ref()
            .map(|u| ChannelRef::Username(u.clone()))
    }

    pub fn is_primary_admin(&self, user_id: i64) -> bool {
        self.admin_id != 0 && self.admin_id == user_id
    }
}
