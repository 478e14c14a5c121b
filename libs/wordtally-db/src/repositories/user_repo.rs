use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use wordtally_shared::api::{NewUser, TaskIncrement, UserPatch};

use crate::error::RepoResult;
use crate::models::user::User;

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_all(&self) -> RepoResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    pub async fn get_by_tg_id(&self, telegram_id: i64) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE telegram_id = ?")
            .bind(telegram_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Inserts a fresh user; a taken `telegram_id` yields `RepoError::Duplicate`.
    pub async fn register(&self, telegram_id: i64, username: &str) -> RepoResult<User> {
        let now = Utc::now();
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (telegram_id, username, created_at, last_reset)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(telegram_id)
        .bind(username)
        .bind(now)
        .bind(now.date_naive())
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn create(&self, new_user: &NewUser) -> RepoResult<User> {
        let now = Utc::now();
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (
                telegram_id, username, created_at, tasks_completed, daily_tasks_completed,
                is_subscribed, is_admin, subscription_end, last_reset
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(new_user.telegram_id)
        .bind(new_user.username.as_deref())
        .bind(now)
        .bind(new_user.tasks_completed)
        .bind(new_user.daily_tasks_completed)
        .bind(new_user.is_subscribed)
        .bind(new_user.is_admin)
        .bind(new_user.subscription_end)
        .bind(now.date_naive())
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    /// Absolute overwrite of the fields present in `patch`.
    pub async fn apply_patch(&self, telegram_id: i64, patch: &UserPatch) -> RepoResult<Option<User>> {
        let (touch_end, new_end) = match patch.subscription_end {
            Some(end) => (true, end),
            None => (false, None),
        };

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                username = COALESCE(?, username),
                tasks_completed = COALESCE(?, tasks_completed),
                daily_tasks_completed = COALESCE(?, daily_tasks_completed),
                is_subscribed = COALESCE(?, is_subscribed),
                is_admin = COALESCE(?, is_admin),
                subscription_end = CASE WHEN ? THEN ? ELSE subscription_end END
            WHERE telegram_id = ?
            RETURNING *
            "#,
        )
        .bind(patch.username.as_deref())
        .bind(patch.tasks_completed)
        .bind(patch.daily_tasks_completed)
        .bind(patch.is_subscribed)
        .bind(patch.is_admin)
        .bind(touch_end)
        .bind(new_end)
        .bind(telegram_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Adds to both counters in one statement so concurrent callers never
    /// overwrite each other's increments.
    pub async fn increment_tasks(
        &self,
        telegram_id: i64,
        delta: &TaskIncrement,
    ) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                tasks_completed = tasks_completed + ?,
                daily_tasks_completed = daily_tasks_completed + ?
            WHERE telegram_id = ?
            RETURNING *
            "#,
        )
        .bind(delta.tasks_completed.unwrap_or(0))
        .bind(delta.daily_tasks_completed.unwrap_or(0))
        .bind(telegram_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn make_admin(&self, telegram_id: i64) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET is_admin = 1 WHERE telegram_id = ? RETURNING *",
        )
        .bind(telegram_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Zeroes the daily counter of every user not yet reset on `today`.
    pub async fn reset_stale_daily(&self, today: NaiveDate) -> RepoResult<u64> {
        let result = sqlx::query(
            "UPDATE users SET daily_tasks_completed = 0, last_reset = ? WHERE last_reset < ?",
        )
        .bind(today)
        .bind(today)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use crate::error::RepoError;
    use chrono::Duration;

    async fn repo() -> UserRepository {
        let pool = init_db("sqlite::memory:").await.unwrap();
        UserRepository::new(pool)
    }

    #[tokio::test]
    async fn register_rejects_duplicate_telegram_id() {
        let repo = repo().await;
        let user = repo.register(100, "ann").await.unwrap();
        assert_eq!(user.tasks_completed, 0);
        assert!(!user.is_admin);

        let again = repo.register(100, "ann").await;
        assert!(matches!(again, Err(RepoError::Duplicate)));
    }

    #[tokio::test]
    async fn increment_adds_to_stored_value() {
        let repo = repo().await;
        repo.register(7, "bob").await.unwrap();
        repo.apply_patch(
            7,
            &UserPatch {
                tasks_completed: Some(3),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let user = repo
            .increment_tasks(
                7,
                &TaskIncrement {
                    tasks_completed: Some(2),
                    daily_tasks_completed: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.tasks_completed, 5);
        assert_eq!(user.daily_tasks_completed, 0);
    }

    #[tokio::test]
    async fn increment_unknown_user_is_none() {
        let repo = repo().await;
        let res = repo.increment_tasks(1, &TaskIncrement::one_task()).await.unwrap();
        assert!(res.is_none());
    }

    #[tokio::test]
    async fn concurrent_increments_are_not_lost() {
        let repo = repo().await;
        repo.register(9, "cat").await.unwrap();

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.increment_tasks(9, &TaskIncrement::one_task()).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let user = repo.get_by_tg_id(9).await.unwrap().unwrap();
        assert_eq!(user.tasks_completed, 20);
        assert_eq!(user.daily_tasks_completed, 20);
    }

    #[tokio::test]
    async fn negative_daily_counter_is_rejected() {
        let repo = repo().await;
        repo.register(5, "dan").await.unwrap();
        let res = repo
            .apply_patch(
                5,
                &UserPatch {
                    daily_tasks_completed: Some(-1),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(res, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn patch_sets_and_clears_subscription_end() {
        let repo = repo().await;
        repo.register(11, "eve").await.unwrap();
        let end = Utc::now() + Duration::days(30);

        let user = repo
            .apply_patch(
                11,
                &UserPatch {
                    is_subscribed: Some(true),
                    subscription_end: Some(Some(end)),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(user.is_subscribed);
        assert_eq!(
            user.subscription_end.map(|t| t.timestamp()),
            Some(end.timestamp())
        );
        assert_eq!(user.username.as_deref(), Some("eve"));

        let user = repo
            .apply_patch(
                11,
                &UserPatch {
                    subscription_end: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(user.subscription_end.is_none());
        assert!(user.is_subscribed);
    }

    #[tokio::test]
    async fn reset_only_touches_stale_rows() {
        let repo = repo().await;
        let today = Utc::now().date_naive();
        repo.register(1, "fresh").await.unwrap();
        repo.register(2, "stale").await.unwrap();
        repo.increment_tasks(1, &TaskIncrement::one_task()).await.unwrap();
        repo.increment_tasks(2, &TaskIncrement::one_task()).await.unwrap();

        sqlx::query("UPDATE users SET last_reset = ? WHERE telegram_id = 2")
            .bind(today - Duration::days(1))
            .execute(&repo.pool)
            .await
            .unwrap();

        assert_eq!(repo.reset_stale_daily(today).await.unwrap(), 1);

        let fresh = repo.get_by_tg_id(1).await.unwrap().unwrap();
        let stale = repo.get_by_tg_id(2).await.unwrap().unwrap();
        assert_eq!(fresh.daily_tasks_completed, 1);
        assert_eq!(stale.daily_tasks_completed, 0);
        assert_eq!(stale.tasks_completed, 1);
        assert_eq!(stale.last_reset, today);
    }

    #[tokio::test]
    async fn make_admin_promotes_existing_user_only() {
        let repo = repo().await;
        repo.register(3, "gil").await.unwrap();
        assert!(repo.make_admin(3).await.unwrap().unwrap().is_admin);
        assert!(repo.make_admin(4).await.unwrap().is_none());
    }
}
