use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "wordtally-api")]
#[command(about = "User, subscription and task-counter API for the wordtally bot", long_about = None)]
pub struct ApiConfig {
    /// SQLite database URL (e.g. sqlite://wordtally.db)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Port to listen on
    #[arg(long, env = "API_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Shared secret the bot must send in X-Bot-Token (unset = open API)
    #[arg(long, env = "API_TOKEN")]
    pub api_token: Option<String>,

    /// How often the daily counter reset job wakes up, in seconds
    #[arg(long, env = "RESET_INTERVAL_SECS", default_value_t = 3600)]
    pub reset_interval_secs: u64,
}
