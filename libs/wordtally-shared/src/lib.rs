use serde::{Deserialize, Deserializer, Serialize};

/// Header the bot uses to authenticate itself against the API.
pub const BOT_TOKEN_HEADER: &str = "X-Bot-Token";

pub mod api {
    use super::*;
    use chrono::{DateTime, Utc};
    use std::collections::BTreeMap;

    pub const INVALID_DATA: &str = "Invalid data";
    pub const ALREADY_REGISTERED: &str = "User already registered";
    pub const USER_NOT_FOUND: &str = "User not found";
    pub const DUPLICATE_TELEGRAM_ID: &str = "This telegram_id is already registered.";
    pub const STATS_FORBIDDEN: &str = "You do not have permission to view this.";

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct UserProfile {
        pub id: i64,
        pub telegram_id: i64,
        pub username: Option<String>,
        pub created_at: DateTime<Utc>,
        pub tasks_completed: i64,
        pub daily_tasks_completed: i64,
        pub is_subscribed: bool,
        pub is_admin: bool,
        pub subscription_end: Option<DateTime<Utc>>,
    }

    impl UserProfile {
        pub fn display_name(&self) -> String {
            self.username
                .clone()
                .unwrap_or_else(|| format!("User {}", self.telegram_id))
        }
    }

    /// Body of `POST /api/users/register/`. Both fields are optional on the
    /// wire so the API can answer a missing field with `Invalid data`.
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct RegisterRequest {
        #[serde(default)]
        pub telegram_id: Option<i64>,
        #[serde(default)]
        pub username: Option<String>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct RegisteredUser {
        pub id: i64,
        pub username: Option<String>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct RegisterResponse {
        pub message: String,
        pub user: RegisteredUser,
    }

    /// Body of `POST /api/users/`.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct NewUser {
        pub telegram_id: i64,
        #[serde(default)]
        pub username: Option<String>,
        #[serde(default)]
        pub tasks_completed: i64,
        #[serde(default)]
        pub daily_tasks_completed: i64,
        #[serde(default)]
        pub is_subscribed: bool,
        #[serde(default)]
        pub is_admin: bool,
        #[serde(default)]
        pub subscription_end: Option<DateTime<Utc>>,
    }

    /// Absolute partial update. `subscription_end: null` clears the expiry,
    /// an absent key leaves it untouched.
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct UserPatch {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub username: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub tasks_completed: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub daily_tasks_completed: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub is_subscribed: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub is_admin: Option<bool>,
        #[serde(
            default,
            deserialize_with = "super::present",
            skip_serializing_if = "Option::is_none"
        )]
        pub subscription_end: Option<Option<DateTime<Utc>>>,
    }

    /// Body of `PATCH /api/users/{id}/update_tasks/`; values are added.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TaskIncrement {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub tasks_completed: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub daily_tasks_completed: Option<i64>,
    }

    impl TaskIncrement {
        /// One finished task: both counters move by one.
        pub fn one_task() -> Self {
            Self {
                tasks_completed: Some(1),
                daily_tasks_completed: Some(1),
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct DailyStat {
        pub username: Option<String>,
        pub count_daily_tasks: i64,
        pub count_tasks: i64,
    }

    /// `telegram_id -> stats`; JSON object keys are the ids as strings.
    pub type DailyStatistics = BTreeMap<i64, DailyStat>;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ErrorBody {
        pub error: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct MessageBody {
        pub message: String,
    }
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent key (`None`).
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
