use super::conversation::Conversation;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

struct Slot {
    conversation: Arc<Mutex<Conversation>>,
    last_access: Instant,
}

impl Slot {
    fn in_use(&self) -> bool {
        Arc::strong_count(&self.conversation) > 1
    }
}

/// Session id to conversation map with idle eviction.
///
/// Each conversation sits behind its own lock: requests on one session run
/// one after another while different sessions proceed in parallel.
pub struct ConversationStore {
    sessions: Mutex<HashMap<String, Slot>>,
    ttl: Duration,
    max_messages: usize,
}

impl ConversationStore {
    pub fn new(ttl: Duration, max_messages: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
            max_messages,
        }
    }

    /// Returns the conversation for `session_id`, creating it when missing or
    /// expired.
    pub async fn session(&self, session_id: &str) -> Arc<Mutex<Conversation>> {
        let mut sessions = self.sessions.lock().await;
        let now = Instant::now();
        if let Some(slot) = sessions.get_mut(session_id) {
            if slot.in_use() || now.duration_since(slot.last_access) < self.ttl {
                slot.last_access = now;
                return Arc::clone(&slot.conversation);
            }
            debug!(session_id, "Session expired, starting a fresh conversation");
        }
        let conversation = Arc::new(Mutex::new(Conversation::new(self.max_messages)));
        sessions.insert(
            session_id.to_string(),
            Slot {
                conversation: Arc::clone(&conversation),
                last_access: now,
            },
        );
        conversation
    }

    /// Empties a session's history. Returns whether the session existed.
    pub async fn clear(&self, session_id: &str) -> bool {
        let conversation = {
            let sessions = self.sessions.lock().await;
            sessions
                .get(session_id)
                .map(|slot| Arc::clone(&slot.conversation))
        };
        match conversation {
            Some(conversation) => {
                conversation.lock().await.clear();
                true
            }
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drops idle sessions. Sessions with a request in flight are kept.
    pub async fn evict_expired(&self) -> usize {
        let mut sessions = self.sessions.lock().await;
        let now = Instant::now();
        let before = sessions.len();
        sessions.retain(|_, slot| slot.in_use() || now.duration_since(slot.last_access) < self.ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!(evicted, remaining = sessions.len(), "Evicted idle sessions");
        }
        evicted
    }

    /// Periodically evicts idle sessions until the store is dropped.
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let store: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(store) = store.upgrade() else {
                    break;
                };
                store.evict_expired().await;
            }
        })
    }
}
