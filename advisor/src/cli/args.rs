//! CLI argument definitions.

use std::net::IpAddr;

use clap::{Parser, Subcommand};

use crate::config::ProviderArgs;

/// Watch Insurance Advisor - decide whether insuring your watch makes financial sense
#[derive(Parser, Debug)]
#[command(name = "watch-advisor")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub provider: ProviderArgs,

    /// Log filter directive, e.g. `debug` or `watch_advisor=trace` (`RUST_LOG` takes precedence)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Subcommand to execute (defaults to `chat`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Filter used when `RUST_LOG` is unset.
    ///
    /// The terminal chat stays quiet by default so logs don't interleave with the conversation.
    pub fn log_filter(&self) -> String {
        if let Some(level) = &self.log_level {
            return level.clone();
        }
        match self.command {
            Some(Commands::Serve { .. }) => "watch_advisor=info,tower_http=info".to_string(),
            _ => "error".to_string(),
        }
    }
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Chat with the advisor in the terminal
    Chat,

    /// Serve the web chat interface
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value = "8080")]
        port: u16,

        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: IpAddr,

        /// Open browser automatically
        #[arg(long)]
        open: bool,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_chat() {
        let cli = Cli::try_parse_from(["watch-advisor", "--api-key", "k"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.log_filter(), "error");
    }

    #[test]
    fn provider_flags_work_after_subcommand() {
        let cli = Cli::try_parse_from([
            "watch-advisor",
            "serve",
            "--port",
            "9000",
            "--model",
            "gpt-4o-mini",
            "--open",
        ])
        .unwrap();

        assert_eq!(cli.provider.model, "gpt-4o-mini");
        match cli.command {
            Some(Commands::Serve { port, open, .. }) => {
                assert_eq!(port, 9000);
                assert!(open);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn serve_logs_at_info_unless_overridden() {
        let cli = Cli::try_parse_from(["watch-advisor", "serve", "--port", "1"]).unwrap();
        assert_eq!(cli.log_filter(), "watch_advisor=info,tower_http=info");

        let cli =
            Cli::try_parse_from(["watch-advisor", "serve", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.log_filter(), "debug");
    }
}
