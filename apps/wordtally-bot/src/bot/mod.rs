use std::time::Duration;

use teloxide::{dptree, prelude::*, types::Update};
use tracing::{error, info};

pub mod commands;
pub mod conversation;
pub mod handlers;
pub mod keyboards;

use crate::AppState;
use commands::Command;

const EVICTION_EVERY: Duration = Duration::from_secs(60);

pub async fn run_bot(bot: Bot, state: AppState) {
    match bot.get_me().await {
        Ok(me) => {
            let username = me.username.clone().unwrap_or_else(|| "unknown".into());
            info!("Bot connected as: @{}", username);
        }
        Err(e) => {
            error!("Bot failed to connect to Telegram: {}", e);
            return;
        }
    }

    match commands::install_command_menus(&bot, state.users.as_ref()).await {
        Ok(n) => info!("command menus installed for {} users", n),
        Err(e) => error!("command menu pass aborted: {}", e),
    }

    tokio::spawn(state.sessions.clone().start_eviction(EVICTION_EVERY));

    let payment_handler = Update::filter_message()
        .filter(|msg: Message| msg.successful_payment().is_some())
        .endpoint(handlers::payment::successful_payment_handler);
    let command_handler = Update::filter_message()
        .filter_command::<Command>()
        .endpoint(handlers::command::command_handler);
    let text_handler = Update::filter_message().endpoint(handlers::command::text_handler);
    let callback_handler =
        Update::filter_callback_query().endpoint(handlers::callback::callback_handler);
    let pre_checkout_handler =
        Update::filter_pre_checkout_query().endpoint(handlers::payment::pre_checkout_handler);

    let mut dispatcher = Dispatcher::builder(
        bot,
        dptree::entry()
            .branch(payment_handler)
            .branch(command_handler)
            .branch(text_handler)
            .branch(callback_handler)
            .branch(pre_checkout_handler),
    )
    .dependencies(dptree::deps![state])
    .default_handler(|upd: std::sync::Arc<Update>| async move {
        info!("Unhandled update: {:?}", upd.id);
    })
    .build();

    tokio::select! {
        _ = dispatcher.dispatch() => {
            info!("Bot dispatcher exited");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Bot received shutdown signal, stopping...");
        }
    }
}
