//! CLI command execution.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use super::args::{Cli, Commands};
use super::repl;
use crate::completion::{CompletionClient, OpenAiClient};
use crate::config::ProviderArgs;
use crate::prompt::SystemPrompt;
use crate::server;
use crate::turn::{Advisor, CLI_TURN_PARAMS};

pub async fn execute(cli: Cli) -> Result<()> {
    let Cli {
        provider, command, ..
    } = cli;

    match command.unwrap_or(Commands::Chat) {
        Commands::Chat => run_chat(&provider).await,
        Commands::Serve { port, host, open } => {
            serve(&provider, SocketAddr::new(host, port), open).await
        }
    }
}

/// Build the provider client. Fails before anything else starts when the credential is missing.
fn build_client(provider: &ProviderArgs) -> Result<Arc<dyn CompletionClient>> {
    let config = provider.openai_config()?;
    info!(model = %config.model, base_url = %config.base_url, "Using completion provider");
    let client = OpenAiClient::new(config).context("Failed to build HTTP client")?;
    Ok(Arc::new(client))
}

async fn run_chat(provider: &ProviderArgs) -> Result<()> {
    let client = build_client(provider)?;
    let prompt = SystemPrompt::load(provider.prompt_file.as_deref())
        .context("Could not load the system prompt")?;

    let advisor = Advisor::new(client, prompt)
        .with_greeting_params(CLI_TURN_PARAMS)
        .with_turn_params(CLI_TURN_PARAMS);

    repl::run(&advisor).await
}

async fn serve(provider: &ProviderArgs, addr: SocketAddr, open: bool) -> Result<()> {
    let client = build_client(provider)?;
    let prompt = SystemPrompt::load_or_default(provider.prompt_file.as_deref());
    server::start_server(addr, Advisor::new(client, prompt), open).await
}
