//! CLI command implementations

use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Args, Subcommand};
use songwire_core::{MirrorPool, ResolutionOutcome, SongwireConfig};
use songwire_search::IdentifierResolver;
use songwire_web::handlers::normalize_query;

/// Mirror pool overrides shared by every command
#[derive(Args, Debug, Default)]
pub struct MirrorArgs {
    /// Mirror base URL; repeat to build the registry (replaces the default pool)
    #[arg(long = "mirror", value_name = "URL")]
    pub mirrors: Vec<String>,
    /// Per-mirror attempt timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl MirrorArgs {
    fn apply(self, config: &mut SongwireConfig) {
        if !self.mirrors.is_empty() {
            config.mirrors.endpoints = self.mirrors;
        }
        if let Some(seconds) = self.timeout {
            config.mirrors.attempt_timeout = Duration::from_secs(seconds);
        }
    }
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP service
    Server {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
        #[command(flatten)]
        mirror: MirrorArgs,
    },
    /// Resolve one query and print the stream URL
    Resolve {
        /// Free-text song query
        query: String,
        #[command(flatten)]
        mirror: MirrorArgs,
    },
    /// Print the configured mirror registry
    Mirrors {
        #[command(flatten)]
        mirror: MirrorArgs,
    },
}

/// Handle the CLI command
///
/// # Errors
/// Returns appropriate error based on the command that fails
pub async fn handle_command(command: Commands) -> anyhow::Result<()> {
    let mut config = SongwireConfig::from_env();

    match command {
        Commands::Server { host, port, mirror } => {
            mirror.apply(&mut config);
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            start_server(config).await
        }
        Commands::Resolve { query, mirror } => {
            mirror.apply(&mut config);
            resolve_query(config, &query).await
        }
        Commands::Mirrors { mirror } => {
            mirror.apply(&mut config);
            list_mirrors(&config)
        }
    }
}

/// Start the HTTP service
///
/// # Errors
/// - Invalid configuration, bind failure, or listener I/O failure
pub async fn start_server(config: SongwireConfig) -> anyhow::Result<()> {
    songwire_web::run_server(config)
        .await
        .context("server failed")
}

/// Run one full resolution and print the stream URL
///
/// # Errors
/// - Invalid configuration, empty query, no match, or exhausted pool
pub async fn resolve_query(config: SongwireConfig, raw_query: &str) -> anyhow::Result<()> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    let Some(query) = normalize_query(raw_query) else {
        bail!("Query empty");
    };

    let identifier_resolver = IdentifierResolver::from_config(&config.search)?;
    let mirror_pool = MirrorPool::from_config(&config.mirrors)?;

    let Some(track) = identifier_resolver.resolve(&query).await else {
        bail!("Song not found on YouTube Music: {query}");
    };

    match mirror_pool.resolve(&track.id).await {
        ResolutionOutcome::Resolved(stream) => {
            tracing::info!(
                "Resolved {} via {} ({})",
                track.id,
                stream.endpoint,
                stream.format
            );
            println!("{}", stream.url);
            Ok(())
        }
        ResolutionOutcome::Exhausted { attempts } => {
            bail!("Stream unavailable: all {attempts} mirrors failed for {}", track.id)
        }
    }
}

/// Print the configured mirror registry
///
/// # Errors
/// - Invalid or empty registry
pub fn list_mirrors(config: &SongwireConfig) -> anyhow::Result<()> {
    let registry = config
        .mirrors
        .registry()
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    println!(
        "{} mirrors (timeout {}s, preferred format {}):",
        registry.len(),
        config.mirrors.attempt_timeout.as_secs(),
        config.mirrors.preferred_format
    );
    for endpoint in registry.endpoints() {
        println!("  {endpoint}");
    }

    Ok(())
}
