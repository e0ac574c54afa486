//! Watch Insurance Advisor.
//!
//! Helps someone decide whether insuring their watch makes financial sense by
//! relaying a short conversation to a chat-completion provider, either in the
//! terminal (`chat`, the default) or as a web app (`serve`).

use anyhow::Result;
use clap::Parser;
use tracing::{debug, warn};

use watch_advisor::cli::{execute, Cli};
use watch_advisor::{config, logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing so `.env` values feed clap's env fallbacks.
    let dotenv = config::load_dotenv();
    let cli = Cli::parse();
    logging::init(&cli.log_filter());

    match dotenv {
        Ok(Some(path)) => debug!(path = %path.display(), "Loaded .env"),
        Ok(None) => {}
        Err(e) => warn!(error = %e, "Failed to load .env"),
    }

    execute(cli).await
}
