//! Completion provider boundary.
//!
//! The provider is an opaque collaborator: it takes the composed message list
//! and returns generated text or a [`CompletionError`].

mod openai;
#[cfg(test)]
pub mod scripted;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Message;

pub use openai::{OpenAiClient, OpenAiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Sampling parameters for one completion call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionParams {
    pub const fn new(temperature: f32, max_tokens: u32) -> Self {
        Self {
            temperature,
            max_tokens,
        }
    }
}

/// Any way a completion call can fail.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Connection, TLS, or timeout failure.
    #[error("request to completion provider failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The provider rejected the request (bad key, quota, overload).
    #[error("completion provider returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("failed to decode completion response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("completion provider returned no text")]
    EmptyResponse,
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generate the next assistant message for `messages`.
    async fn complete(
        &self,
        messages: &[Message],
        params: CompletionParams,
    ) -> Result<String, CompletionError>;
}
