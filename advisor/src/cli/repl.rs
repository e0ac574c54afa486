//! Interactive terminal loop: one process, one conversation.

use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;

use super::display;
use crate::models::SessionId;
use crate::session::SessionStore;
use crate::turn::{Advisor, TurnOutcome};

/// Inputs that end the conversation (compared case-insensitively).
pub const EXIT_TOKENS: &[&str] = &["quit", "exit", "bye", "goodbye", "q"];

const PROMPT: &str = "  You: ";

pub fn is_exit_token(line: &str) -> bool {
    let line = line.trim().to_lowercase();
    EXIT_TOKENS.contains(&line.as_str())
}

/// What the loop does after a line of input.
#[derive(Debug, PartialEq, Eq)]
pub enum Step {
    /// Line was blank; nothing happened.
    Skip,
    /// The user asked to leave.
    Exit,
    /// Ctrl-C, at the prompt or while waiting on the provider.
    Interrupted,
    /// Input stream closed.
    Eof,
    /// A turn ran and produced this outcome.
    Replied(TurnOutcome),
}

impl Step {
    pub const fn ends_loop(&self) -> bool {
        matches!(self, Self::Exit | Self::Interrupted | Self::Eof)
    }
}

/// The process-wide conversation behind the terminal loop.
pub struct ReplSession<'a> {
    advisor: &'a Advisor,
    store: SessionStore,
    id: SessionId,
}

impl<'a> ReplSession<'a> {
    pub fn new(advisor: &'a Advisor) -> Self {
        Self {
            advisor,
            store: SessionStore::new(),
            id: SessionId::generate(),
        }
    }

    /// Ask the provider for its opening line.
    pub async fn greet(&self) -> TurnOutcome {
        self.advisor.take_session_turn(&self.store, self.id, "").await
    }

    pub async fn handle_line(&self, line: &str) -> Step {
        let line = line.trim();
        if line.is_empty() {
            return Step::Skip;
        }
        if is_exit_token(line) {
            return Step::Exit;
        }
        Step::Replied(self.advisor.take_session_turn(&self.store, self.id, line).await)
    }

    /// Turn one editor read into the next step of the loop.
    pub async fn handle_read(&self, read: Result<String, ReadlineError>) -> Result<Step> {
        match read {
            Ok(line) => Ok(self.handle_line(&line).await),
            Err(ReadlineError::Interrupted) => Ok(Step::Interrupted),
            Err(ReadlineError::Eof) => Ok(Step::Eof),
            Err(e) => Err(e).context("Failed to read input"),
        }
    }

    pub async fn turns(&self) -> usize {
        self.store.get_or_create(self.id).await.len()
    }
}

/// Run the interactive advisor until an exit token, Ctrl-C, or end of input.
pub async fn run(advisor: &Advisor) -> Result<()> {
    let mut rl = DefaultEditor::new().context("Failed to initialize line editor")?;
    let session = ReplSession::new(advisor);

    display::header();
    let greeting = tokio::select! {
        outcome = session.greet() => outcome,
        _ = tokio::signal::ctrl_c() => {
            display::interrupted();
            return Ok(());
        }
    };
    display::advisor(&greeting.reply);
    display::hint();

    loop {
        let read = tokio::task::block_in_place(|| rl.readline(PROMPT));
        if let Ok(line) = &read {
            let line = line.trim();
            if !line.is_empty() {
                if let Err(e) = rl.add_history_entry(line) {
                    debug!(error = %e, "Failed to record history entry");
                }
            }
        }

        let step = tokio::select! {
            step = session.handle_read(read) => step?,
            _ = tokio::signal::ctrl_c() => Step::Interrupted,
        };

        let done = step.ends_loop();
        match step {
            Step::Skip => {}
            Step::Replied(outcome) => display::advisor(&outcome.reply),
            Step::Exit => display::farewell(),
            Step::Interrupted => display::interrupted(),
            Step::Eof => {}
        }
        if done {
            break;
        }
    }

    debug!(messages = session.turns().await, "Conversation ended");
    Ok(())
}
