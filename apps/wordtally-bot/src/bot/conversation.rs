use std::sync::Arc;

use chrono::{DateTime, Utc};
use wordtally_shared::api::{ALREADY_REGISTERED, DailyStatistics, TaskIncrement, UserPatch};

use crate::api_client::ApiError;
use crate::models::payment::SubscriptionPayload;
use crate::services::session_service::{ConversationState, SessionStore};
use crate::services::subscription_service::renewed_expiry;
use crate::services::user_service::UserDirectory;
use crate::word_count::{render_report, word_frequency};

/// Unsubscribed users may complete this many tasks in total.
pub const FREE_TASK_LIMIT: i64 = 5;

const NOT_REGISTERED: &str = "You are not registered yet. Send /start and press the button to register.";
const PERMISSION_DENIED: &str = "You do not have permission to do that.";
const IDLE_HINT: &str = "Available commands: /word_count, /subscribe. Send /start to register.";

/// What the bot should send back to the chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    /// Text with the inline registration button attached.
    AskToRegister(String),
    Invoice(SubscriptionPayload),
}

impl Reply {
    fn text(s: impl Into<String>) -> Self {
        Reply::Text(s.into())
    }
}

/// Chat flow: registration, word-count tasks, subscription and admin promotion.
///
/// Private chats only: registration keys on the chat id, everything else on
/// the sender id, and the two are equal in a private chat.
#[derive(Clone)]
pub struct Conversation {
    users: Arc<dyn UserDirectory>,
    sessions: SessionStore,
    price: u32,
}

impl Conversation {
    pub fn new(users: Arc<dyn UserDirectory>, sessions: SessionStore, price: u32) -> Self {
        Self {
            users,
            sessions,
            price,
        }
    }

    pub fn start(&self) -> Reply {
        Reply::AskToRegister(
            "Hello! I count words in your texts. Press the button below to register.".to_string(),
        )
    }

    pub async fn register(&self, telegram_id: i64, display_name: &str) -> Reply {
        match self.users.register(telegram_id, display_name).await {
            Ok(_) => {
                tracing::info!("registered {} as {}", telegram_id, display_name);
                Reply::text(format!("Registration successful! Welcome, {}.", display_name))
            }
            Err(ApiError::Rejected(msg)) if msg == ALREADY_REGISTERED => {
                Reply::text("You are already registered.")
            }
            Err(e) => {
                tracing::error!("registration of {} failed: {}", telegram_id, e);
                Reply::text("Registration failed. Please try again later.")
            }
        }
    }

    pub async fn begin_word_count(&self, chat_id: i64) -> Reply {
        self.sessions
            .set(chat_id, ConversationState::AwaitingWordCountText)
            .await;
        Reply::text("Send me the text and I will count the words in it.")
    }

    pub async fn begin_add_admin(&self, chat_id: i64, sender_id: i64) -> Reply {
        match self.users.find(sender_id).await {
            Ok(Some(user)) if user.is_admin => {
                self.sessions
                    .set(chat_id, ConversationState::AwaitingAdminId)
                    .await;
                Reply::text("Send the Telegram id of the user to promote.")
            }
            Ok(_) => Reply::text(PERMISSION_DENIED),
            Err(e) => failure(&e),
        }
    }

    pub async fn subscribe(&self, chat_id: i64, sender_id: i64) -> Reply {
        match self.users.find(sender_id).await {
            Ok(None) => Reply::AskToRegister(
                "Please register first, then send /subscribe again.".to_string(),
            ),
            Ok(Some(user)) if user.is_subscribed => {
                let until = user
                    .subscription_end
                    .map(|end| end.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "an unknown date".to_string());
                Reply::text(format!("You are already subscribed until {}.", until))
            }
            Ok(Some(_)) => Reply::Invoice(SubscriptionPayload {
                chat_id,
                amount: self.price,
            }),
            Err(e) => failure(&e),
        }
    }

    pub async fn complete_payment(&self, telegram_id: i64, now: DateTime<Utc>) -> Reply {
        let user = match self.users.find(telegram_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::warn!("payment from unregistered user {}", telegram_id);
                return Reply::text(NOT_REGISTERED);
            }
            Err(e) => return failure(&e),
        };

        let expiry = renewed_expiry(user.subscription_end, now);
        let patch = UserPatch {
            is_subscribed: Some(true),
            subscription_end: Some(Some(expiry)),
            ..Default::default()
        };
        match self.users.update(telegram_id, &patch).await {
            Ok(_) => {
                tracing::info!("subscription of {} renewed until {}", telegram_id, expiry);
                Reply::text(format!(
                    "Payment received! Your subscription is active until {}.",
                    expiry.format("%Y-%m-%d")
                ))
            }
            Err(e) => {
                tracing::error!("payment of {} not recorded: {}", telegram_id, e);
                failure(&e)
            }
        }
    }

    pub async fn admin_stats(&self, sender_id: i64) -> Reply {
        match self.users.daily_statistics(sender_id).await {
            Ok(stats) => Reply::Text(render_stats(&stats)),
            Err(ApiError::NotFound) => Reply::text(NOT_REGISTERED),
            Err(ApiError::Forbidden(_)) => Reply::text(PERMISSION_DENIED),
            Err(e) => failure(&e),
        }
    }

    /// Non-command text, interpreted according to the chat's state.
    pub async fn handle_text(&self, chat_id: i64, sender_id: i64, text: &str) -> Reply {
        match self.sessions.get(chat_id).await {
            ConversationState::Idle => Reply::text(IDLE_HINT),
            ConversationState::AwaitingWordCountText => {
                self.sessions.clear(chat_id).await;
                self.count_words(sender_id, text).await
            }
            ConversationState::AwaitingAdminId => self.promote(chat_id, text).await,
        }
    }

    async fn count_words(&self, sender_id: i64, text: &str) -> Reply {
        let user = match self.users.find(sender_id).await {
            Ok(Some(user)) => user,
            Ok(None) => return Reply::text(NOT_REGISTERED),
            Err(e) => return failure(&e),
        };
        if !user.is_subscribed && user.tasks_completed >= FREE_TASK_LIMIT {
            return Reply::text(format!(
                "You have used all {} free tasks. Send /subscribe to continue.",
                FREE_TASK_LIMIT
            ));
        }

        let report = render_report(&word_frequency(text));
        match self.users.add_tasks(sender_id, TaskIncrement::one_task()).await {
            Ok(()) => Reply::Text(report),
            Err(e) => failure(&e),
        }
    }

    async fn promote(&self, chat_id: i64, text: &str) -> Reply {
        let Ok(target) = text.trim().parse::<i64>() else {
            return Reply::text("That is not a valid id. Send the numeric Telegram id.");
        };
        self.sessions.clear(chat_id).await;

        match self.users.find(target).await {
            Ok(None) => Reply::text(format!("User {} not found.", target)),
            Ok(Some(_)) => match self.users.promote(target).await {
                Ok(()) => {
                    tracing::info!("user {} promoted to admin", target);
                    Reply::text(format!("User {} is now an admin.", target))
                }
                Err(ApiError::NotFound) => Reply::text(format!("User {} not found.", target)),
                Err(e) => failure(&e),
            },
            Err(e) => failure(&e),
        }
    }
}

fn render_stats(stats: &DailyStatistics) -> String {
    let mut out = String::from("Daily statistics:");
    for (id, stat) in stats {
        let name = stat.username.as_deref().unwrap_or("unknown");
        out.push_str(&format!(
            "\n{} ({}): today {}, total {}",
            name, id, stat.count_daily_tasks, stat.count_tasks
        ));
    }
    out
}

fn failure(e: &ApiError) -> Reply {
    match e {
        ApiError::Transport(_) | ApiError::Upstream(_) | ApiError::Unauthorized => {
            tracing::error!("users API unavailable: {}", e);
            Reply::text("The service is unavailable right now. Please try again later.")
        }
        other => {
            tracing::error!("users API call failed: {}", other);
            Reply::text(format!("Something went wrong: {}", other))
        }
    }
}
