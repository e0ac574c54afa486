//! Data models for conversations and sessions.

mod conversation;
mod message;
mod session;

pub use conversation::{Conversation, ConversationError};
pub use message::{Message, MessageRole};
pub use session::{Session, SessionId};
