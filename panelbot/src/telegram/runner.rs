//! Dispatcher runner: converts teloxide updates into core events and hands
//! them to the handler chain.
//!
//! Each update is processed in a spawned task so a slow panel HTTP call never
//! blocks the dispatcher.

use anyhow::Result;
use handler_chain::HandlerChain;
use panelbot_core::{Event, ToCoreEvent};
use teloxide::prelude::*;
use tracing::{error, info, instrument};

use super::adapters::{TelegramCallbackWrapper, TelegramMessageWrapper};

fn spawn_handle(chain: HandlerChain, event: Event) {
    tokio::spawn(async move {
        if let Err(e) = chain.handle(&event).await {
            error!(error = %e, user_id = event.user.id, "Handler chain failed");
        }
    });
}

/// Starts the dispatcher with message and callback-query branches. Runs until
/// the process is interrupted.
#[instrument(skip(bot, chain))]
pub async fn run_dispatcher(bot: teloxide::Bot, chain: HandlerChain) -> Result<()> {
    if let Ok(me) = bot.get_me().await {
        if let Some(username) = &me.user.username {
            info!(username = %username, "Bot identity confirmed");
        }
    }

    let message_chain = chain.clone();
    let callback_chain = chain;

    let schema = dptree::entry()
        .branch(Update::filter_message().endpoint(move |msg: Message| {
            let chain = message_chain.clone();
            async move {
                let event = TelegramMessageWrapper(&msg).to_core();
                info!(
                    user_id = event.user.id,
                    chat_id = event.chat.id,
                    "Received message update"
                );
                spawn_handle(chain, event);
                respond(())
            }
        }))
        .branch(
            Update::filter_callback_query().endpoint(move |query: CallbackQuery| {
                let chain = callback_chain.clone();
                async move {
                    let event = TelegramCallbackWrapper(&query).to_core();
                    info!(
                        user_id = event.user.id,
                        chat_id = event.chat.id,
                        "Received callback update"
                    );
                    spawn_handle(chain, event);
                    respond(())
                }
            }),
        );

    Dispatcher::builder(bot, schema)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
