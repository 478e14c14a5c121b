use chrono::NaiveDate;
use wordtally_db::RepoError;
use wordtally_db::repositories::user_repo::UserRepository;
use wordtally_db::sqlx::SqlitePool;
use wordtally_shared::api::{
    ALREADY_REGISTERED, DailyStat, DailyStatistics, INVALID_DATA, NewUser, RegisterRequest,
    RegisterResponse, RegisteredUser, STATS_FORBIDDEN, TaskIncrement, UserPatch, UserProfile,
};

use crate::error::{ApiError, ApiResult};

const USERNAME_MAX_LEN: usize = 150;

#[derive(Debug, Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

impl UserService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            user_repo: UserRepository::new(pool),
        }
    }

    pub async fn list(&self) -> ApiResult<Vec<UserProfile>> {
        let users = self.user_repo.get_all().await?;
        Ok(users.into_iter().map(UserProfile::from).collect())
    }

    pub async fn get(&self, telegram_id: i64) -> ApiResult<UserProfile> {
        self.user_repo
            .get_by_tg_id(telegram_id)
            .await?
            .map(UserProfile::from)
            .ok_or(ApiError::NotFound)
    }

    pub async fn create(&self, new_user: NewUser) -> ApiResult<UserProfile> {
        if let Some(name) = &new_user.username {
            check_username(name)?;
        }
        let user = self.user_repo.create(&new_user).await?;
        tracing::info!("created user {}", user.telegram_id);
        Ok(user.into())
    }

    pub async fn register(&self, req: RegisterRequest) -> ApiResult<RegisterResponse> {
        let (telegram_id, username) = match (req.telegram_id, req.username) {
            (Some(id), Some(name)) if id != 0 && !name.trim().is_empty() => (id, name),
            _ => return Err(ApiError::Validation(INVALID_DATA.to_string())),
        };
        check_username(&username)?;

        let user = self
            .user_repo
            .register(telegram_id, &username)
            .await
            .map_err(|e| match e {
                RepoError::Duplicate => ApiError::Validation(ALREADY_REGISTERED.to_string()),
                other => other.into(),
            })?;
        tracing::info!("registered user {} ({})", user.telegram_id, username);

        Ok(RegisterResponse {
            message: "User registered successfully".to_string(),
            user: RegisteredUser {
                id: user.id,
                username: user.username,
            },
        })
    }

    pub async fn patch(&self, telegram_id: i64, patch: UserPatch) -> ApiResult<UserProfile> {
        if let Some(name) = &patch.username {
            check_username(name)?;
        }
        self.user_repo
            .apply_patch(telegram_id, &patch)
            .await?
            .map(UserProfile::from)
            .ok_or(ApiError::NotFound)
    }

    pub async fn add_tasks(&self, telegram_id: i64, delta: TaskIncrement) -> ApiResult<UserProfile> {
        self.user_repo
            .increment_tasks(telegram_id, &delta)
            .await?
            .map(UserProfile::from)
            .ok_or(ApiError::NotFound)
    }

    pub async fn make_admin(&self, telegram_id: i64) -> ApiResult<()> {
        match self.user_repo.make_admin(telegram_id).await? {
            Some(_) => {
                tracing::info!("user {} promoted to admin", telegram_id);
                Ok(())
            }
            None => Err(ApiError::NotFound),
        }
    }

    /// Per-user counters, only for a requester flagged as admin.
    pub async fn daily_statistics(&self, requester_id: i64) -> ApiResult<DailyStatistics> {
        let requester = self
            .user_repo
            .get_by_tg_id(requester_id)
            .await?
            .ok_or(ApiError::NotFound)?;
        if !requester.is_admin {
            return Err(ApiError::Forbidden(STATS_FORBIDDEN.to_string()));
        }

        let users = self.user_repo.get_all().await?;
        Ok(users
            .iter()
            .map(|u| (u.telegram_id, DailyStat::from(u)))
            .collect())
    }

    pub async fn reset_daily(&self, today: NaiveDate) -> ApiResult<u64> {
        Ok(self.user_repo.reset_stale_daily(today).await?)
    }
}

fn check_username(name: &str) -> ApiResult<()> {
    if name.chars().count() > USERNAME_MAX_LEN {
        return Err(ApiError::Validation(format!(
            "Ensure username has no more than {} characters.",
            USERNAME_MAX_LEN
        )));
    }
    Ok(())
}
