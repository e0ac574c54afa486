//! Session model binding one conversation to one client or process.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Conversation;

/// Opaque session identifier (`UUIDv7`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a fresh, time-ordered identifier.
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    /// Parse an identifier previously handed to a client.
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s.trim()).ok().map(Self)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A session owns exactly one conversation.
#[derive(Debug, Clone)]
pub struct Session {
    /// Identifier the session is registered under.
    pub id: SessionId,
    /// Message history, excluding the system instruction.
    pub conversation: Conversation,
    /// When the session was first seen.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session with an empty conversation.
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            conversation: Conversation::new(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_generated_ids() {
        let id = SessionId::generate();
        assert_eq!(SessionId::parse(&id.to_string()), Some(id));
    }

    #[test]
    fn rejects_garbage_ids() {
        assert_eq!(SessionId::parse("not-a-session"), None);
        assert_eq!(SessionId::parse(""), None);
    }

    #[test]
    fn new_session_is_empty() {
        let session = Session::new(SessionId::generate());
        assert!(session.conversation.is_empty());
    }
}
