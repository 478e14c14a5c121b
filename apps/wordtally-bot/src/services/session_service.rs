use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

/// What the bot expects next from a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversationState {
    #[default]
    Idle,
    AwaitingWordCountText,
    AwaitingAdminId,
}

#[derive(Debug, Clone, Copy)]
struct Session {
    state: ConversationState,
    touched: Instant,
}

/// Per-chat conversation state, kept in memory only.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<i64, Session>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn get(&self, chat_id: i64) -> ConversationState {
        self.sessions
            .read()
            .await
            .get(&chat_id)
            .map(|s| s.state)
            .unwrap_or_default()
    }

    pub async fn set(&self, chat_id: i64, state: ConversationState) {
        if state == ConversationState::Idle {
            self.clear(chat_id).await;
            return;
        }
        let mut sessions = self.sessions.write().await;
        sessions.insert(
            chat_id,
            Session {
                state,
                touched: Instant::now(),
            },
        );
    }

    pub async fn clear(&self, chat_id: i64) {
        self.sessions.write().await.remove(&chat_id);
    }

    /// Drops sessions idle for at least the TTL; returns how many went.
    pub async fn evict_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.touched.elapsed() < self.ttl);
        before - sessions.len()
    }

    pub async fn start_eviction(self, every: Duration) {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let evicted = self.evict_expired().await;
            if evicted > 0 {
                tracing::debug!("evicted {} idle conversation sessions", evicted);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_chat_is_idle() {
        let store = SessionStore::new(Duration::from_secs(60));
        assert_eq!(store.get(1).await, ConversationState::Idle);
    }

    #[tokio::test]
    async fn going_idle_removes_the_entry() {
        let store = SessionStore::new(Duration::from_secs(60));
        store.set(1, ConversationState::AwaitingAdminId).await;
        assert_eq!(store.get(1).await, ConversationState::AwaitingAdminId);
        assert_eq!(store.sessions.read().await.len(), 1);

        store.set(1, ConversationState::Idle).await;
        assert!(store.sessions.read().await.is_empty());
    }

    #[tokio::test]
    async fn chats_do_not_share_state() {
        let store = SessionStore::new(Duration::from_secs(60));
        store.set(1, ConversationState::AwaitingWordCountText).await;
        store.set(2, ConversationState::AwaitingAdminId).await;
        assert_eq!(store.get(1).await, ConversationState::AwaitingWordCountText);
        assert_eq!(store.get(2).await, ConversationState::AwaitingAdminId);
    }

    #[tokio::test]
    async fn eviction_respects_ttl() {
        let fresh = SessionStore::new(Duration::from_secs(3600));
        fresh.set(1, ConversationState::AwaitingAdminId).await;
        assert_eq!(fresh.evict_expired().await, 0);

        let stale = SessionStore::new(Duration::ZERO);
        stale.set(1, ConversationState::AwaitingAdminId).await;
        assert_eq!(stale.evict_expired().await, 1);
        assert_eq!(stale.get(1).await, ConversationState::Idle);
    }
}
