use async_trait::async_trait;
use wordtally_shared::api::{
    DailyStatistics, MessageBody, RegisterRequest, RegisterResponse, TaskIncrement, UserPatch,
    UserProfile,
};

use crate::api_client::{ApiClient, ApiError, ApiResult};

/// The slice of the users API the bot depends on.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// `Ok(None)` when the user is not registered.
    async fn find(&self, telegram_id: i64) -> ApiResult<Option<UserProfile>>;
    async fn register(&self, telegram_id: i64, username: &str) -> ApiResult<RegisterResponse>;
    async fn add_tasks(&self, telegram_id: i64, delta: TaskIncrement) -> ApiResult<()>;
    async fn update(&self, telegram_id: i64, patch: &UserPatch) -> ApiResult<UserProfile>;
    async fn promote(&self, telegram_id: i64) -> ApiResult<()>;
    async fn list(&self) -> ApiResult<Vec<UserProfile>>;
    async fn daily_statistics(&self, requester_id: i64) -> ApiResult<DailyStatistics>;
}

#[derive(Clone)]
pub struct UserService {
    api: ApiClient,
    stats_url: String,
}

impl UserService {
    pub fn new(api: ApiClient, stats_url: &str) -> Self {
        Self {
            api,
            stats_url: stats_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl UserDirectory for UserService {
    async fn find(&self, telegram_id: i64) -> ApiResult<Option<UserProfile>> {
        match self.api.get(&format!("/{}/", telegram_id)).await {
            Ok(user) => Ok(Some(user)),
            Err(ApiError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn register(&self, telegram_id: i64, username: &str) -> ApiResult<RegisterResponse> {
        let body = RegisterRequest {
            telegram_id: Some(telegram_id),
            username: Some(username.to_string()),
        };
        self.api.post("/register/", &body).await
    }

    async fn add_tasks(&self, telegram_id: i64, delta: TaskIncrement) -> ApiResult<()> {
        let _: MessageBody = self
            .api
            .patch(&format!("/{}/update_tasks/", telegram_id), &delta)
            .await?;
        Ok(())
    }

    async fn update(&self, telegram_id: i64, patch: &UserPatch) -> ApiResult<UserProfile> {
        self.api.patch(&format!("/{}/", telegram_id), patch).await
    }

    async fn promote(&self, telegram_id: i64) -> ApiResult<()> {
        let _: MessageBody = self
            .api
            .post(&format!("/{}/make_admin/", telegram_id), &serde_json::json!({}))
            .await?;
        Ok(())
    }

    async fn list(&self) -> ApiResult<Vec<UserProfile>> {
        self.api.get("/").await
    }

    async fn daily_statistics(&self, requester_id: i64) -> ApiResult<DailyStatistics> {
        let url = format!("{}/{}/daily_statistics/", self.stats_url, requester_id);
        self.api.get_url(&url).await
    }
}
