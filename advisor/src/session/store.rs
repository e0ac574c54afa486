//! In-memory session store.
//!
//! Each session sits behind its own mutex so a whole turn (user message,
//! provider call, reply) runs serialized per session id while different
//! sessions proceed independently. Reset removes the session outright, and
//! the map holds at most `capacity` sessions, evicting the oldest idle one.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::models::{Conversation, ConversationError, Message, Session, SessionId};

/// Shared handle to one session.
pub type SessionHandle = Arc<Mutex<Session>>;

/// Default upper bound on live sessions.
const DEFAULT_SESSION_CAPACITY: usize = 10_000;

/// Thread-safe map of session id to session.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, SessionHandle>>>,
    capacity: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_SESSION_CAPACITY)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that keeps at most `capacity` sessions (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sessions: Arc::default(),
            capacity: capacity.max(1),
        }
    }

    /// Get the handle for a session, registering an empty one on first access.
    pub async fn handle(&self, id: SessionId) -> SessionHandle {
        if let Some(handle) = self.sessions.read().await.get(&id) {
            return Arc::clone(handle);
        }

        let mut map = self.sessions.write().await;
        if !map.contains_key(&id) && map.len() >= self.capacity {
            evict_oldest(&mut map);
        }
        let handle = map.entry(id).or_insert_with(|| {
            debug!(session_id = %id, "Creating session");
            Arc::new(Mutex::new(Session::new(id)))
        });
        Arc::clone(handle)
    }

    /// Snapshot of the conversation held under `id`, creating it if needed.
    pub async fn get_or_create(&self, id: SessionId) -> Conversation {
        let handle = self.handle(id).await;
        let session = handle.lock().await;
        session.conversation.clone()
    }

    /// Append a message to the end of the session's conversation.
    pub async fn append(&self, id: SessionId, message: Message) -> Result<(), ConversationError> {
        let handle = self.handle(id).await;
        let mut session = handle.lock().await;
        session.conversation.push(message)
    }

    /// Destroy the session; the next access starts an empty one. Idempotent.
    pub async fn reset(&self, id: SessionId) {
        let removed = self.sessions.write().await.remove(&id);
        if let Some(handle) = removed {
            let session = handle.lock().await;
            debug!(
                session_id = %id,
                dropped = session.conversation.len(),
                age_secs = (Utc::now() - session.created_at).num_seconds(),
                "Resetting conversation"
            );
        }
    }

    /// Number of registered sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

/// Drop the oldest session not currently in a turn.
fn evict_oldest(map: &mut HashMap<SessionId, SessionHandle>) {
    let oldest = map
        .iter()
        .filter_map(|(id, handle)| handle.try_lock().ok().map(|s| (*id, s.created_at)))
        .min_by_key(|(_, created_at)| *created_at)
        .map(|(id, _)| id);

    if let Some(id) = oldest {
        map.remove(&id);
        info!(session_id = %id, "Evicted oldest session at capacity");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageRole;

    #[tokio::test]
    async fn get_or_create_registers_empty_conversation() {
        let store = SessionStore::new();
        let id = SessionId::generate();

        assert!(store.is_empty().await);
        assert!(store.get_or_create(id).await.is_empty());
        assert_eq!(store.len().await, 1);

        store.get_or_create(id).await;
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn append_preserves_call_order() {
        let store = SessionStore::new();
        let id = SessionId::generate();

        store.append(id, Message::user("one")).await.unwrap();
        store.append(id, Message::assistant("two")).await.unwrap();
        store.append(id, Message::user("three")).await.unwrap();

        let conversation = store.get_or_create(id).await;
        let contents: Vec<_> = conversation.messages().iter().map(Message::content).collect();
        assert_eq!(contents, ["one", "two", "three"]);
    }

    #[tokio::test]
    async fn append_rejects_system_message() {
        let store = SessionStore::new();
        let id = SessionId::generate();

        let result = store.append(id, Message::system("persona")).await;
        assert_eq!(result, Err(ConversationError::SystemMessage));
        assert!(store.get_or_create(id).await.is_empty());
    }

    #[tokio::test]
    async fn reset_is_idempotent() {
        let store = SessionStore::new();
        let id = SessionId::generate();

        store.reset(id).await;
        store.append(id, Message::user("hi")).await.unwrap();
        store.reset(id).await;
        store.reset(id).await;

        assert!(store.get_or_create(id).await.is_empty());
    }

    #[tokio::test]
    async fn reset_removes_the_session() {
        let store = SessionStore::new();
        let id = SessionId::generate();

        store.append(id, Message::user("hi")).await.unwrap();
        assert_eq!(store.len().await, 1);

        store.reset(id).await;
        assert!(store.is_empty().await);

        store.reset(SessionId::generate()).await;
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn capacity_evicts_oldest_session() {
        let store = SessionStore::with_capacity(2);
        let first = SessionId::generate();
        let second = SessionId::generate();
        let third = SessionId::generate();

        store.append(first, Message::user("first")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        store.append(second, Message::user("second")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        store.append(third, Message::user("third")).await.unwrap();

        assert_eq!(store.len().await, 2);
        assert_eq!(store.get_or_create(second).await.len(), 1);
        assert_eq!(store.get_or_create(third).await.len(), 1);
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = SessionStore::new();
        let alice = SessionId::generate();
        let bob = SessionId::generate();

        store.append(alice, Message::user("alice")).await.unwrap();
        store.append(bob, Message::user("bob")).await.unwrap();
        store.reset(bob).await;

        let conversation = store.get_or_create(alice).await;
        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.messages()[0].content(), "alice");
        assert!(store.get_or_create(bob).await.is_empty());
    }

    #[tokio::test]
    async fn concurrent_sessions_do_not_mix() {
        let store = SessionStore::new();
        let ids: Vec<_> = (0..8).map(|_| SessionId::generate()).collect();

        let mut tasks = Vec::new();
        for (n, id) in ids.iter().copied().enumerate() {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                for i in 0..10 {
                    store
                        .append(id, Message::user(format!("{n}-{i}")))
                        .await
                        .unwrap();
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        for (n, id) in ids.into_iter().enumerate() {
            let conversation = store.get_or_create(id).await;
            assert_eq!(conversation.len(), 10);
            for (i, msg) in conversation.messages().iter().enumerate() {
                assert_eq!(msg.role(), MessageRole::User);
                assert_eq!(msg.content(), format!("{n}-{i}"));
            }
        }
    }
}
