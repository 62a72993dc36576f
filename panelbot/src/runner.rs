//! Main entry: init logging, open the database, assemble components, run the
//! dispatcher.

use std::sync::Arc;

use anyhow::Result;
use panelbot_core::init_tracing;
use storage::Database;
use tracing::{error, info, instrument};

use crate::components::{build_handler_chain, AppComponents};
use crate::config::BotConfig;
use crate::telegram::{run_dispatcher, TelegramBotAdapter};

#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;

    if let Some(dir) = std::path::Path::new(&config.log_file).parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }
    init_tracing(&config.log_file)?;

    info!(
        database_url = %config.database_url,
        admin_id = config.admin_id,
        gate_enabled = config.channel().is_some(),
        "Initializing bot"
    );

    let db = Database::connect(&config.database_url).await.map_err(|e| {
        error!(error = %e, database_url = %config.database_url, "Failed to open database");
        anyhow::anyhow!("Failed to open database: {}", e)
    })?;

    let teloxide_bot = {
        let bot = teloxide::Bot::new(config.bot_token.clone());
        if let Some(ref url_str) = config.telegram_api_url {
            match reqwest::Url::parse(url_str) {
                Ok(url) => bot.set_api_url(url),
                Err(e) => {
                    error!(error = %e, url = %url_str, "Invalid TELEGRAM_API_URL, using default");
                    bot
                }
            }
        } else {
            bot
        }
    };

    let adapter = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));
    let components = AppComponents::new(config, db, adapter);
    let chain = build_handler_chain(&components);

    info!("Bot started successfully");

    run_dispatcher(teloxide_bot, chain).await
}
