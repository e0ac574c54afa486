//! Watch Insurance Advisor - a conversational front-end for an LLM chat-completion API.
//!
//! Architecture:
//! - `models`: messages, conversations, and sessions
//! - `session`: in-memory per-session store and cookie-based session detection
//! - `prompt`: system instruction loading and prompt composition
//! - `completion`: the provider boundary and an OpenAI-compatible client
//! - `turn`: one turn of input, completion, and fallback handling
//! - `server` / `cli`: the web and terminal front-ends

pub mod cli;
pub mod completion;
pub mod config;
pub mod logging;
pub mod models;
pub mod prompt;
pub mod server;
pub mod session;
pub mod turn;
