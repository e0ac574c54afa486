//! One conversational turn: record input, compose, call the provider, record the reply.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::completion::{CompletionClient, CompletionError, CompletionParams};
use crate::models::{Conversation, Message, SessionId};
use crate::prompt::{compose, SystemPrompt};
use crate::session::SessionStore;

/// Reply substituted when a turn's completion call fails.
pub const FALLBACK_REPLY: &str = "I apologize, but I encountered an issue. Please try again.";

/// Reply substituted when the opening greeting cannot be fetched.
pub const CONNECT_FALLBACK_REPLY: &str =
    "I apologize, but I'm having trouble connecting. Please try again.";

/// Opening greeting.
pub const GREETING_PARAMS: CompletionParams = CompletionParams::new(0.7, 300);
/// Regular web turn.
pub const WEB_TURN_PARAMS: CompletionParams = CompletionParams::new(0.7, 400);
/// Terminal turns, greeting included.
pub const CLI_TURN_PARAMS: CompletionParams = CompletionParams::new(0.7, 500);

/// What a turn produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Text shown to the user and stored as the assistant turn.
    pub reply: String,
    /// Provider error detail when `reply` is a fallback.
    pub error: Option<String>,
}

impl TurnOutcome {
    pub const fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

/// Drives turns against a completion provider with a fixed system instruction.
#[derive(Clone)]
pub struct Advisor {
    client: Arc<dyn CompletionClient>,
    system_prompt: SystemPrompt,
    greeting_params: CompletionParams,
    turn_params: CompletionParams,
}

impl Advisor {
    pub fn new(client: Arc<dyn CompletionClient>, system_prompt: SystemPrompt) -> Self {
        Self {
            client,
            system_prompt,
            greeting_params: GREETING_PARAMS,
            turn_params: WEB_TURN_PARAMS,
        }
    }

    #[must_use]
    pub fn with_greeting_params(mut self, params: CompletionParams) -> Self {
        self.greeting_params = params;
        self
    }

    #[must_use]
    pub fn with_turn_params(mut self, params: CompletionParams) -> Self {
        self.turn_params = params;
        self
    }

    pub const fn system_prompt(&self) -> &SystemPrompt {
        &self.system_prompt
    }

    /// Run one turn against `conversation`.
    ///
    /// Non-empty input is appended as a user message first. Empty input on an
    /// empty conversation asks for the opening greeting. Exactly one assistant
    /// message is appended whether or not the provider call succeeds.
    pub async fn take_turn(&self, conversation: &mut Conversation, input: &str) -> TurnOutcome {
        let input = input.trim();
        let greeting = conversation.is_empty() && input.is_empty();

        if !input.is_empty() {
            conversation.push_user(input);
        }

        let (params, fallback) = if greeting {
            (self.greeting_params, CONNECT_FALLBACK_REPLY)
        } else {
            (self.turn_params, FALLBACK_REPLY)
        };

        let messages = compose(&self.system_prompt, conversation);
        debug!(messages = messages.len(), greeting, "Composed prompt");

        let outcome = match self.client.complete(&messages, params).await {
            Ok(reply) => TurnOutcome { reply, error: None },
            Err(e) => {
                warn!(error = %e, "Completion failed, substituting fallback reply");
                TurnOutcome {
                    reply: fallback.to_string(),
                    error: Some(e.to_string()),
                }
            }
        };

        conversation.push_assistant(outcome.reply.clone());
        outcome
    }

    /// Run one turn for a stored session, holding the session for the whole turn.
    pub async fn take_session_turn(
        &self,
        store: &SessionStore,
        id: SessionId,
        input: &str,
    ) -> TurnOutcome {
        let handle = store.handle(id).await;
        let mut session = handle.lock().await;
        let outcome = self.take_turn(&mut session.conversation, input).await;
        debug!(
            session_id = %id,
            turns = session.conversation.len(),
            fallback = outcome.is_fallback(),
            "Turn complete"
        );
        outcome
    }

    /// Reply to client-held history without touching any stored session.
    pub async fn reply_to_history(
        &self,
        history: Vec<Message>,
        message: Option<&str>,
    ) -> Result<String, CompletionError> {
        let mut conversation = Conversation::from_history(history);
        if let Some(text) = message.map(str::trim).filter(|m| !m.is_empty()) {
            conversation.push_user(text);
        }
        let messages = compose(&self.system_prompt, &conversation);
        self.client.complete(&messages, self.turn_params).await
    }
}
