use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wordtally_api::config::ApiConfig;
use wordtally_api::services::reset_service::DailyResetService;
use wordtally_api::{AppState, router};
use wordtally_db::init_db;

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Warning: failed to load .env file: {}", e);
    }

    let config = ApiConfig::parse();

    let file_appender = tracing_appender::rolling::never(".", "wordtally-api.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wordtally_api=debug,tower_http=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stdout))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .init();

    tracing::info!("wordtally-api {} starting", env!("CARGO_PKG_VERSION"));

    let pool = init_db(&config.database_url).await?;
    tracing::info!("Database initialized");

    let state = AppState::new(pool, config.api_token.clone());
    if state.api_token.is_none() {
        tracing::warn!("API_TOKEN is not set: /api routes accept unauthenticated calls");
    }

    let reset_users = Arc::clone(&state.user_service);
    let reset_every = Duration::from_secs(config.reset_interval_secs.max(1));
    tokio::spawn(async move {
        DailyResetService::new(reset_users, reset_every).start().await;
    });

    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
