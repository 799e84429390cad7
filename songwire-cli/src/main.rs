//! Songwire CLI - Command-line interface
//!
//! Runs the HTTP service or a one-off resolution from the terminal.

mod commands;

use anyhow::Context;
use clap::Parser;
use songwire_core::tracing_setup::{CliLogLevel, init_tracing};

#[derive(Parser)]
#[command(name = "songwire", version)]
#[command(about = "Resolve song queries to playable audio streams")]
struct Cli {
    /// Console log level; the log file always records everything
    #[arg(long, global = true, value_enum, default_value_t = CliLogLevel::Info)]
    log_level: CliLogLevel,

    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_level.as_tracing_level(), None)
        .context("failed to initialize logging")?;

    commands::handle_command(cli.command).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Commands;

    #[test]
    fn test_parse_server_flags() {
        let cli = Cli::try_parse_from([
            "songwire",
            "server",
            "--port",
            "8080",
            "--mirror",
            "https://a.example",
            "--mirror",
            "https://b.example",
            "--timeout",
            "5",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(cli.log_level, CliLogLevel::Debug);
        match cli.command {
            Commands::Server { host, port, mirror } => {
                assert_eq!(host, None);
                assert_eq!(port, Some(8080));
                assert_eq!(mirror.mirrors, vec!["https://a.example", "https://b.example"]);
                assert_eq!(mirror.timeout, Some(5));
            }
            _ => panic!("expected server command"),
        }
    }

    #[test]
    fn test_parse_resolve() {
        let cli = Cli::try_parse_from(["songwire", "resolve", "Bohemian Rhapsody"]).unwrap();

        assert_eq!(cli.log_level, CliLogLevel::Info);
        assert!(matches!(cli.command, Commands::Resolve { ref query, .. } if query == "Bohemian Rhapsody"));
    }

    #[test]
    fn test_resolve_requires_query() {
        assert!(Cli::try_parse_from(["songwire", "resolve"]).is_err());
    }
}
