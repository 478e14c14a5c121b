use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use teloxide::prelude::*;
use wordtally_shared::api::{UserPatch, UserProfile};

use crate::services::user_service::UserDirectory;

pub const SUBSCRIPTION_DAYS: i64 = 30;
pub const REMIND_AT_DAYS_LEFT: i64 = 2;

const SECS_PER_DAY: i64 = 86_400;

/// New expiry after a payment: 30 days past the later of the current expiry and now.
pub fn renewed_expiry(current: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DateTime<Utc> {
    let base = current.map_or(now, |end| end.max(now));
    base + Duration::days(SUBSCRIPTION_DAYS)
}

/// Whole days until `expiry`, rounded toward negative infinity.
pub fn days_left(expiry: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (expiry - now).num_seconds().div_euclid(SECS_PER_DAY)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepAction {
    Remind,
    Expire,
    Keep,
}

pub fn classify(user: &UserProfile, now: DateTime<Utc>) -> SweepAction {
    let Some(expiry) = user.subscription_end.filter(|_| user.is_subscribed) else {
        return SweepAction::Keep;
    };
    match days_left(expiry, now) {
        REMIND_AT_DAYS_LEFT => SweepAction::Remind,
        d if d < 0 => SweepAction::Expire,
        _ => SweepAction::Keep,
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, chat_id: i64, text: &str) -> anyhow::Result<()>;
}

#[async_trait]
impl Notifier for Bot {
    async fn notify(&self, chat_id: i64, text: &str) -> anyhow::Result<()> {
        self.send_message(ChatId(chat_id), text).await?;
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub reminded: usize,
    pub expired: usize,
    pub failed: usize,
}

pub struct SubscriptionSweep {
    users: Arc<dyn UserDirectory>,
    notifier: Arc<dyn Notifier>,
}

impl SubscriptionSweep {
    pub fn new(users: Arc<dyn UserDirectory>, notifier: Arc<dyn Notifier>) -> Self {
        Self { users, notifier }
    }

    pub async fn start(self, every: StdDuration) {
        // First tick fires immediately, so a sweep runs at start-up.
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            match self.run_once(Utc::now()).await {
                Ok(report) => tracing::info!(
                    "subscription sweep: {} reminded, {} expired, {} failed",
                    report.reminded,
                    report.expired,
                    report.failed
                ),
                Err(e) => tracing::error!("subscription sweep could not list users: {}", e),
            }
        }
    }

    pub async fn run_once(&self, now: DateTime<Utc>) -> anyhow::Result<SweepReport> {
        let users = self.users.list().await?;
        let mut report = SweepReport::default();

        for user in &users {
            match classify(user, now) {
                SweepAction::Keep => {}
                SweepAction::Remind => {
                    let text = format!(
                        "Your subscription ends in {} days. Send /subscribe to renew it.",
                        REMIND_AT_DAYS_LEFT
                    );
                    match self.notifier.notify(user.telegram_id, &text).await {
                        Ok(()) => report.reminded += 1,
                        Err(e) => {
                            tracing::warn!("reminder to {} failed: {}", user.telegram_id, e);
                            report.failed += 1;
                        }
                    }
                }
                SweepAction::Expire => {
                    let patch = UserPatch {
                        is_subscribed: Some(false),
                        ..Default::default()
                    };
                    match self.users.update(user.telegram_id, &patch).await {
                        Ok(_) => {
                            tracing::info!("subscription of {} expired", user.telegram_id);
                            report.expired += 1;
                        }
                        Err(e) => {
                            tracing::warn!("expiring {} failed: {}", user.telegram_id, e);
                            report.failed += 1;
                        }
                    }
                }
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeDirectory, RecordingNotifier, profile};

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn renewal_extends_from_future_expiry() {
        let end = now() + Duration::days(10);
        assert_eq!(renewed_expiry(Some(end), now()), end + Duration::days(30));
    }

    #[test]
    fn renewal_starts_now_without_or_with_past_expiry() {
        assert_eq!(renewed_expiry(None, now()), now() + Duration::days(30));
        let past = now() - Duration::days(3);
        assert_eq!(renewed_expiry(Some(past), now()), now() + Duration::days(30));
    }

    #[test]
    fn days_left_floors() {
        assert_eq!(days_left(now() + Duration::hours(60), now()), 2);
        assert_eq!(days_left(now() + Duration::hours(47), now()), 1);
        assert_eq!(days_left(now() - Duration::hours(1), now()), -1);
        assert_eq!(days_left(now() + Duration::minutes(5), now()), 0);
    }

    #[test]
    fn unsubscribed_users_are_left_alone() {
        let mut user = profile(1);
        user.subscription_end = Some(now() - Duration::days(5));
        assert_eq!(classify(&user, now()), SweepAction::Keep);
    }

    #[tokio::test]
    async fn sweep_reminds_once_and_expires() {
        let dir = Arc::new(FakeDirectory::default());

        let mut reminded = profile(1);
        reminded.is_subscribed = true;
        reminded.subscription_end = Some(now() + Duration::hours(50));
        let mut lapsed = profile(2);
        lapsed.is_subscribed = true;
        lapsed.subscription_end = Some(now() - Duration::hours(2));
        let mut active = profile(3);
        active.is_subscribed = true;
        active.subscription_end = Some(now() + Duration::days(20));
        dir.insert(reminded).await;
        dir.insert(lapsed).await;
        dir.insert(active).await;

        let notifier = Arc::new(RecordingNotifier::default());
        let sweep = SubscriptionSweep::new(dir.clone(), notifier.clone());
        let report = sweep.run_once(now()).await.unwrap();

        assert_eq!(
            report,
            SweepReport {
                reminded: 1,
                expired: 1,
                failed: 0
            }
        );
        let sent = notifier.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, 1);

        assert!(!dir.get(2).await.unwrap().is_subscribed);
        assert!(dir.get(3).await.unwrap().is_subscribed);
    }
}
