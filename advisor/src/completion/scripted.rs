//! Scripted completion client for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{CompletionClient, CompletionError, CompletionParams};
use crate::models::{Message, MessageRole};

/// Replays queued results, then echoes the latest user message.
#[derive(Default)]
pub struct ScriptedClient {
    script: Mutex<VecDeque<Result<String, CompletionError>>>,
    calls: Mutex<Vec<(Vec<Message>, CompletionParams)>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str) -> Self {
        self.push(Ok(text.to_string()))
    }

    pub fn fail(self) -> Self {
        self.push(Err(CompletionError::Status {
            status: 503,
            message: "provider overloaded".to_string(),
        }))
    }

    fn push(self, result: Result<String, CompletionError>) -> Self {
        self.script.lock().unwrap().push_back(result);
        self
    }

    /// Every message list received so far, with its parameters.
    pub fn calls(&self) -> Vec<(Vec<Message>, CompletionParams)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(
        &self,
        messages: &[Message],
        params: CompletionParams,
    ) -> Result<String, CompletionError> {
        self.calls.lock().unwrap().push((messages.to_vec(), params));

        if let Some(result) = self.script.lock().unwrap().pop_front() {
            return result;
        }

        let last_user = messages
            .iter()
            .rev()
            .find(|m| m.role() == MessageRole::User)
            .map_or("greeting", Message::content);
        Ok(format!("ack: {last_user}"))
    }
}
