//! Conversation model: the ordered, append-only history of one session.

use serde::Serialize;
use thiserror::Error;

use super::{Message, MessageRole};

/// Errors raised when mutating a conversation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConversationError {
    /// System instructions are prepended when composing a prompt and are never stored.
    #[error("system messages cannot be stored in a conversation")]
    SystemMessage,
}

/// Chronological list of user and assistant messages.
///
/// Never contains a system message. Grows without bound until [`clear`](Self::clear).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Build a conversation from client-supplied history, dropping any system entries.
    pub fn from_history(history: impl IntoIterator<Item = Message>) -> Self {
        Self {
            messages: history
                .into_iter()
                .filter(|m| m.role() != MessageRole::System)
                .collect(),
        }
    }

    /// Append a message to the end of the conversation.
    pub fn push(&mut self, message: Message) -> Result<(), ConversationError> {
        if message.role() == MessageRole::System {
            return Err(ConversationError::SystemMessage);
        }
        self.messages.push(message);
        Ok(())
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// True when the latest message is a user turn still waiting for its reply.
    pub fn awaiting_reply(&self) -> bool {
        self.last().is_some_and(|m| m.role() == MessageRole::User)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_system_messages() {
        let mut conversation = Conversation::new();
        assert_eq!(
            conversation.push(Message::system("be nice")),
            Err(ConversationError::SystemMessage)
        );
        assert!(conversation.is_empty());
    }

    #[test]
    fn keeps_append_order() {
        let mut conversation = Conversation::new();
        conversation.push_user("first");
        conversation.push_assistant("second");
        conversation.push(Message::user("third")).unwrap();

        let contents: Vec<_> = conversation.messages().iter().map(Message::content).collect();
        assert_eq!(contents, ["first", "second", "third"]);
        assert!(conversation.awaiting_reply());
    }

    #[test]
    fn from_history_drops_system_entries() {
        let conversation = Conversation::from_history([
            Message::system("injected"),
            Message::user("hi"),
            Message::assistant("hello"),
        ]);
        assert_eq!(conversation.len(), 2);
        assert!(!conversation.awaiting_reply());
    }

    #[test]
    fn clear_empties_history() {
        let mut conversation = Conversation::new();
        conversation.push_user("hi");
        conversation.clear();
        assert!(conversation.is_empty());
        assert_eq!(conversation.last(), None);
    }
}
