//! Logging for the Songwire binary.
//!
//! The console shows what the operator asked for. The log file under
//! `logs/` records every event, so a failed resolution can be followed
//! mirror by mirror after the fact.

use std::fs::{File, create_dir_all};
use std::path::{Path, PathBuf};

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::{Result, SongwireError};

/// Log file name, truncated on every start.
pub const LOG_FILE_NAME: &str = "songwire-last-run.log";

/// Installs the global subscriber: console at `console_level` (or `RUST_LOG`)
/// plus a trace-level file at `{logs_dir}/songwire-last-run.log`.
///
/// `logs_dir` defaults to `./logs` and is created if missing.
///
/// # Errors
/// - `SongwireError::Io` - Logs directory or log file cannot be created
/// - `SongwireError::Configuration` - A global subscriber is already installed
pub fn init_tracing(console_level: Level, logs_dir: Option<&Path>) -> Result<()> {
    let log_path = prepare_log_file(logs_dir.unwrap_or_else(|| Path::new("logs")))?;
    let log_file = File::create(&log_path)?;

    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(console_level.as_str().to_ascii_lowercase()));
    let console = fmt::layer()
        .with_target(true)
        .compact()
        .with_filter(console_filter);

    let file = fmt::layer()
        .with_ansi(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(log_file)
        .with_filter(EnvFilter::new("trace"));

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()
        .map_err(|e| SongwireError::Configuration {
            reason: format!("logging already initialized: {e}"),
        })?;

    tracing::debug!("Logging to console at {console_level} and to {}", log_path.display());
    Ok(())
}

fn prepare_log_file(logs_dir: &Path) -> Result<PathBuf> {
    create_dir_all(logs_dir)?;
    Ok(logs_dir.join(LOG_FILE_NAME))
}

/// Console verbosity selectable with `--log-level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliLogLevel {
    /// Failures only
    Error,
    /// Failures and exhausted mirror pools
    Warn,
    /// Matches and resolved streams
    Info,
    /// Individual mirror misses
    Debug,
    /// Everything
    Trace,
}

impl CliLogLevel {
    /// The `tracing` level this option maps to.
    pub fn as_tracing_level(self) -> Level {
        match self {
            CliLogLevel::Error => Level::ERROR,
            CliLogLevel::Warn => Level::WARN,
            CliLogLevel::Info => Level::INFO,
            CliLogLevel::Debug => Level::DEBUG,
            CliLogLevel::Trace => Level::TRACE,
        }
    }
}
