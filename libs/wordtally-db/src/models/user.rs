use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use wordtally_shared::api::{DailyStat, UserProfile};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub telegram_id: i64,
    pub username: Option<String>,
    pub created_at: DateTime<Utc>,
    pub tasks_completed: i64,
    pub daily_tasks_completed: i64,
    pub is_subscribed: bool,
    pub is_admin: bool,
    pub subscription_end: Option<DateTime<Utc>>,
    pub last_reset: NaiveDate,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        UserProfile {
            id: user.id,
            telegram_id: user.telegram_id,
            username: user.username,
            created_at: user.created_at,
            tasks_completed: user.tasks_completed,
            daily_tasks_completed: user.daily_tasks_completed,
            is_subscribed: user.is_subscribed,
            is_admin: user.is_admin,
            subscription_end: user.subscription_end,
        }
    }
}

impl From<&User> for DailyStat {
    fn from(user: &User) -> Self {
        DailyStat {
            username: user.username.clone(),
            count_daily_tasks: user.daily_tasks_completed,
            count_tasks: user.tasks_completed,
        }
    }
}
