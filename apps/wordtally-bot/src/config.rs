use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "wordtally Telegram bot", long_about = None)]
pub struct BotConfig {
    /// Telegram bot token
    #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
    pub bot_token: String,

    /// Base URL of the users API, e.g. http://localhost:8000/api/users
    #[arg(long, env = "API_BASE_URL")]
    pub api_base_url: String,

    /// Base URL the daily statistics are fetched from
    #[arg(long, env = "STATS_URL")]
    pub stats_url: String,

    #[arg(long, env = "PAYMENT_PROVIDER_TOKEN", hide_env_values = true)]
    pub payment_provider_token: String,

    /// Shared secret sent as X-Bot-Token
    #[arg(long, env = "API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Subscription price in minor currency units
    #[arg(long, env = "SUBSCRIPTION_PRICE", default_value_t = 19900)]
    pub subscription_price: u32,

    #[arg(long, env = "SUBSCRIPTION_CURRENCY", default_value = "RUB")]
    pub subscription_currency: String,

    #[arg(
        long,
        env = "SWEEP_INTERVAL_SECS",
        default_value_t = 86_400,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub sweep_interval_secs: u64,

    #[arg(long, env = "SESSION_TTL_SECS", default_value_t = 3_600)]
    pub session_ttl_secs: u64,

    #[arg(long, env = "API_TIMEOUT_SECS", default_value_t = 10)]
    pub api_timeout_secs: u64,
}
