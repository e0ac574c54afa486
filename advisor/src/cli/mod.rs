//! Command-line entry: argument parsing, commands, and the terminal chat loop.

mod args;
mod commands;
mod display;
pub mod repl;

pub use args::{Cli, Commands};
pub use commands::execute;
