//! In-memory stand-ins for the users API and Telegram, used by unit tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use wordtally_shared::api::{
    ALREADY_REGISTERED, DailyStat, DailyStatistics, RegisterResponse, RegisteredUser,
    STATS_FORBIDDEN, TaskIncrement, UserPatch, UserProfile,
};

use crate::api_client::{ApiError, ApiResult};
use crate::services::subscription_service::Notifier;
use crate::services::user_service::UserDirectory;

pub fn profile(telegram_id: i64) -> UserProfile {
    UserProfile {
        id: telegram_id,
        telegram_id,
        username: Some(format!("user{}", telegram_id)),
        created_at: Utc::now(),
        tasks_completed: 0,
        daily_tasks_completed: 0,
        is_subscribed: false,
        is_admin: false,
        subscription_end: None,
    }
}

#[derive(Default)]
pub struct FakeDirectory {
    users: Mutex<BTreeMap<i64, UserProfile>>,
    offline: Mutex<bool>,
}

impl FakeDirectory {
    pub async fn insert(&self, user: UserProfile) {
        self.users.lock().await.insert(user.telegram_id, user);
    }

    pub async fn get(&self, telegram_id: i64) -> Option<UserProfile> {
        self.users.lock().await.get(&telegram_id).cloned()
    }

    pub async fn go_offline(&self) {
        *self.offline.lock().await = true;
    }

    async fn check_online(&self) -> ApiResult<()> {
        if *self.offline.lock().await {
            return Err(ApiError::Upstream(503));
        }
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for FakeDirectory {
    async fn find(&self, telegram_id: i64) -> ApiResult<Option<UserProfile>> {
        self.check_online().await?;
        Ok(self.get(telegram_id).await)
    }

    async fn register(&self, telegram_id: i64, username: &str) -> ApiResult<RegisterResponse> {
        self.check_online().await?;
        let mut users = self.users.lock().await;
        if users.contains_key(&telegram_id) {
            return Err(ApiError::Rejected(ALREADY_REGISTERED.to_string()));
        }
        let mut user = profile(telegram_id);
        user.username = Some(username.to_string());
        users.insert(telegram_id, user);
        Ok(RegisterResponse {
            message: "User registered successfully".to_string(),
            user: RegisteredUser {
                id: telegram_id,
                username: Some(username.to_string()),
            },
        })
    }

    async fn add_tasks(&self, telegram_id: i64, delta: TaskIncrement) -> ApiResult<()> {
        self.check_online().await?;
        let mut users = self.users.lock().await;
        let user = users.get_mut(&telegram_id).ok_or(ApiError::NotFound)?;
        user.tasks_completed += delta.tasks_completed.unwrap_or(0);
        user.daily_tasks_completed += delta.daily_tasks_completed.unwrap_or(0);
        Ok(())
    }

    async fn update(&self, telegram_id: i64, patch: &UserPatch) -> ApiResult<UserProfile> {
        self.check_online().await?;
        let mut users = self.users.lock().await;
        let user = users.get_mut(&telegram_id).ok_or(ApiError::NotFound)?;
        if let Some(flag) = patch.is_subscribed {
            user.is_subscribed = flag;
        }
        if let Some(end) = patch.subscription_end {
            user.subscription_end = end;
        }
        if let Some(flag) = patch.is_admin {
            user.is_admin = flag;
        }
        if let Some(n) = patch.tasks_completed {
            user.tasks_completed = n;
        }
        Ok(user.clone())
    }

    async fn promote(&self, telegram_id: i64) -> ApiResult<()> {
        self.check_online().await?;
        let mut users = self.users.lock().await;
        let user = users.get_mut(&telegram_id).ok_or(ApiError::NotFound)?;
        user.is_admin = true;
        Ok(())
    }

    async fn list(&self) -> ApiResult<Vec<UserProfile>> {
        self.check_online().await?;
        Ok(self.users.lock().await.values().cloned().collect())
    }

    async fn daily_statistics(&self, requester_id: i64) -> ApiResult<DailyStatistics> {
        self.check_online().await?;
        let users = self.users.lock().await;
        let requester = users.get(&requester_id).ok_or(ApiError::NotFound)?;
        if !requester.is_admin {
            return Err(ApiError::Forbidden(STATS_FORBIDDEN.to_string()));
        }
        Ok(users
            .values()
            .map(|u| {
                (
                    u.telegram_id,
                    DailyStat {
                        username: u.username.clone(),
                        count_daily_tasks: u.daily_tasks_completed,
                        count_tasks: u.tasks_completed,
                    },
                )
            })
            .collect())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(i64, String)>>,
}

impl RecordingNotifier {
    pub async fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, chat_id: i64, text: &str) -> anyhow::Result<()> {
        self.sent.lock().await.push((chat_id, text.to_string()));
        Ok(())
    }
}
