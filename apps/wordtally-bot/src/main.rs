use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use teloxide::prelude::*;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod api_client;
mod bot;
mod config;
mod models;
mod services;
mod state;
#[cfg(test)]
mod testing;
mod word_count;

use crate::api_client::ApiClient;
use crate::config::BotConfig;
use crate::services::session_service::SessionStore;
use crate::services::subscription_service::SubscriptionSweep;
use crate::services::user_service::{UserDirectory, UserService};
use crate::state::{AppState, InvoiceSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "wordtally_bot=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = BotConfig::parse();
    tracing::info!("Starting wordtally bot...");

    let api = ApiClient::new(
        &config.api_base_url,
        config.api_token.clone(),
        Duration::from_secs(config.api_timeout_secs),
    )?;
    if !api.has_token() {
        tracing::warn!("API_TOKEN is not set; calling the users API without a service token");
    }

    let users: Arc<dyn UserDirectory> = Arc::new(UserService::new(api, &config.stats_url));
    let sessions = SessionStore::new(Duration::from_secs(config.session_ttl_secs));
    let state = AppState::new(
        users.clone(),
        sessions,
        InvoiceSettings {
            provider_token: config.payment_provider_token.clone(),
            currency: config.subscription_currency.clone(),
            price: config.subscription_price,
        },
    );

    let bot = Bot::new(config.bot_token.clone());

    let sweep = SubscriptionSweep::new(users, Arc::new(bot.clone()));
    tokio::spawn(sweep.start(Duration::from_secs(config.sweep_interval_secs)));

    bot::run_bot(bot, state).await;
    Ok(())
}
