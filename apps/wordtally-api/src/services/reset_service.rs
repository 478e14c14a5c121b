use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{error, info};

use crate::services::user_service::UserService;

/// Zeroes daily task counters once per calendar day (UTC).
pub struct DailyResetService {
    users: Arc<UserService>,
    every: Duration,
}

impl DailyResetService {
    pub fn new(users: Arc<UserService>, every: Duration) -> Self {
        Self { users, every }
    }

    pub async fn start(&self) {
        info!("Starting DailyResetService background worker...");
        let mut interval = tokio::time::interval(self.every);

        loop {
            interval.tick().await;
            let today = Utc::now().date_naive();
            match self.users.reset_daily(today).await {
                Ok(0) => {}
                Ok(n) => info!("Daily task counters reset for {} users", n),
                Err(e) => error!("Error during daily counter reset: {}", e),
            }
        }
    }
}
