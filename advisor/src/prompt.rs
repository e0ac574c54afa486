//! System instruction loading and prompt composition.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{Conversation, Message};

/// File name the system instruction is looked up under.
pub const PROMPT_FILE_NAME: &str = "watch_insurance_prompt.txt";

/// Minimal instruction used when no prompt file can be found.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful watch insurance advisor.";

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("could not find prompt file (searched: {searched})")]
    NotFound { searched: String },
    #[error("failed to read prompt file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The fixed leading instruction. Cheap to clone.
#[derive(Clone, PartialEq, Eq)]
pub struct SystemPrompt(Arc<str>);

impl SystemPrompt {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Load the instruction from `explicit`, or the first default location that exists.
    ///
    /// Default locations, in order:
    /// 1. `./watch_insurance_prompt.txt`
    /// 2. `./prompts/watch_insurance_prompt.txt`
    /// 3. `<config dir>/watch-advisor/watch_insurance_prompt.txt`
    pub fn load(explicit: Option<&Path>) -> Result<Self, PromptError> {
        let candidates = candidate_paths(explicit);

        for path in &candidates {
            if !path.is_file() {
                continue;
            }
            let text = std::fs::read_to_string(path).map_err(|source| PromptError::Read {
                path: path.clone(),
                source,
            })?;
            debug!(path = %path.display(), bytes = text.len(), "Loaded system prompt");
            return Ok(Self::new(text));
        }

        Err(PromptError::NotFound {
            searched: candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
    }

    /// Like [`load`](Self::load), falling back to [`DEFAULT_SYSTEM_PROMPT`].
    pub fn load_or_default(explicit: Option<&Path>) -> Self {
        Self::load(explicit).unwrap_or_else(|e| {
            warn!(error = %e, "Using default system prompt");
            Self::new(DEFAULT_SYSTEM_PROMPT)
        })
    }
}

impl Default for SystemPrompt {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_PROMPT)
    }
}

impl fmt::Debug for SystemPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SystemPrompt")
            .field(&format_args!("{} bytes", self.0.len()))
            .finish()
    }
}

fn candidate_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    if let Some(path) = explicit {
        return vec![path.to_path_buf()];
    }

    let mut paths = vec![
        PathBuf::from(PROMPT_FILE_NAME),
        Path::new("prompts").join(PROMPT_FILE_NAME),
    ];
    if let Some(config) = dirs::config_dir() {
        paths.push(config.join("watch-advisor").join(PROMPT_FILE_NAME));
    }
    paths
}

/// Build the message list sent to the provider: the system instruction followed by the history.
pub fn compose(system_prompt: &SystemPrompt, conversation: &Conversation) -> Vec<Message> {
    let mut messages = Vec::with_capacity(conversation.len() + 1);
    messages.push(Message::system(system_prompt.as_str()));
    messages.extend(conversation.messages().iter().cloned());
    messages
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::models::MessageRole;

    #[test]
    fn compose_prepends_single_system_message() {
        let prompt = SystemPrompt::new("You advise on watches.");
        let mut conversation = Conversation::new();
        conversation.push_user("Is my watch worth insuring?");
        conversation.push_assistant("What is it worth?");
        let before = conversation.clone();

        let messages = compose(&prompt, &conversation);

        assert_eq!(conversation, before);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0], Message::system("You advise on watches."));
        assert_eq!(&messages[1..], conversation.messages());
        let systems = messages
            .iter()
            .filter(|m| m.role() == MessageRole::System)
            .count();
        assert_eq!(systems, 1);
    }

    #[test]
    fn compose_empty_conversation_sends_system_alone() {
        let prompt = SystemPrompt::default();
        let messages = compose(&prompt, &Conversation::new());
        assert_eq!(messages, vec![Message::system(DEFAULT_SYSTEM_PROMPT)]);
    }

    #[test]
    fn load_reads_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Be brief.").unwrap();

        let prompt = SystemPrompt::load(Some(file.path())).unwrap();
        assert_eq!(prompt.as_str(), "Be brief.");
    }

    #[test]
    fn load_missing_explicit_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");

        let err = SystemPrompt::load(Some(&missing)).unwrap_err();
        assert!(matches!(err, PromptError::NotFound { .. }));
        assert!(err.to_string().contains("nope.txt"));
    }

    #[test]
    fn load_or_default_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let prompt = SystemPrompt::load_or_default(Some(&dir.path().join("missing.txt")));
        assert_eq!(prompt.as_str(), DEFAULT_SYSTEM_PROMPT);
    }
}
