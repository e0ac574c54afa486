//! Provider configuration from flags, the environment, and `.env`.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use thiserror::Error;

use crate::completion::{OpenAiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY not found. Add it to your environment or .env file and try again.")]
    MissingCredential,
}

/// Completion provider options shared by every command.
#[derive(Args, Clone)]
pub struct ProviderArgs {
    /// API key for the completion provider
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Model to request completions from
    #[arg(long, env = "ADVISOR_MODEL", default_value = DEFAULT_MODEL, global = true)]
    pub model: String,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,

    /// File holding the system instruction
    #[arg(long, env = "ADVISOR_PROMPT_FILE", global = true)]
    pub prompt_file: Option<PathBuf>,

    /// Seconds to wait for the provider before giving up
    #[arg(long, default_value = "60", global = true)]
    pub timeout_secs: u64,
}

impl ProviderArgs {
    /// Resolve the client configuration. Fails when no credential is present.
    pub fn openai_config(&self) -> Result<OpenAiConfig, ConfigError> {
        let api_key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingCredential)?;

        Ok(OpenAiConfig::new(api_key)
            .with_base_url(self.base_url.clone())
            .with_model(self.model.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs)))
    }
}

impl fmt::Debug for ProviderArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderArgs")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("prompt_file", &self.prompt_file)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Load `.env` from the current directory or its parents.
///
/// Returns the loaded path, or `None` when there is no `.env` file.
pub fn load_dotenv() -> Result<Option<PathBuf>, dotenvy::Error> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}
