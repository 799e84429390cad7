//! Centralized configuration for Songwire.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use std::time::Duration;

use crate::mirror::MirrorRegistry;
use crate::{Result, SongwireError};

/// Public Piped API instances used when no registry is configured.
pub const DEFAULT_MIRRORS: &[&str] = &[
    "https://pipedapi.kavin.rocks",
    "https://api.piped.video",
    "https://pipedapi.tokhmi.xyz",
    "https://piped-api.garudalinux.org",
    "https://api.piped.projectsegfau.lt",
    "https://pipedapi.wglab.net",
    "https://api.martinfc.eu",
    "https://pipedapi.drgns.space",
];

/// Central configuration for all Songwire components.
///
/// Groups related configuration settings into logical sections.
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct SongwireConfig {
    pub mirrors: MirrorConfig,
    pub search: SearchConfig,
    pub server: ServerConfig,
}

/// Mirror pool configuration.
///
/// Controls which stream mirrors are tried, how long a single attempt may
/// take, and which audio format is preferred when a mirror offers several.
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    /// Base URLs of mirrors implementing `/streams/{id}`
    pub endpoints: Vec<String>,
    /// Upper bound for one mirror attempt, including body download
    pub attempt_timeout: Duration,
    /// Format label preferred among returned audio streams
    pub preferred_format: String,
    /// User agent for mirror requests
    pub user_agent: &'static str,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            endpoints: DEFAULT_MIRRORS.iter().map(|url| url.to_string()).collect(),
            attempt_timeout: Duration::from_secs(3),
            preferred_format: "m4a".to_string(),
            user_agent: "songwire/0.1.0",
        }
    }
}

impl MirrorConfig {
    /// Builds the validated mirror registry from configured endpoints.
    ///
    /// # Errors
    /// - `SongwireError::Configuration` - Empty, malformed, or duplicate endpoints
    pub fn registry(&self) -> Result<MirrorRegistry> {
        MirrorRegistry::new(self.endpoints.iter().cloned())
    }
}

/// Search oracle configuration.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Base URL of the YouTube Music web API
    pub base_url: String,
    /// Timeout for one search request
    pub timeout: Duration,
    /// Interface language sent with search requests
    pub language: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://music.youtube.com".to_string(),
            timeout: Duration::from_secs(10),
            language: "en".to_string(),
        }
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7860,
        }
    }
}

impl ServerConfig {
    /// Returns `host:port` suitable for binding a listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl SongwireConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Allows runtime configuration via environment variables while
    /// maintaining sensible defaults. Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Mirror configuration overrides
        if let Ok(mirrors) = std::env::var("SONGWIRE_MIRRORS") {
            config.mirrors.endpoints = mirrors
                .split(',')
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(seconds) = parse_env::<u64>("SONGWIRE_MIRROR_TIMEOUT_SECS") {
            config.mirrors.attempt_timeout = Duration::from_secs(seconds);
        }

        if let Ok(format) = std::env::var("SONGWIRE_PREFERRED_FORMAT") {
            config.mirrors.preferred_format = format.trim().to_string();
        }

        // Search configuration overrides
        if let Ok(url) = std::env::var("SONGWIRE_SEARCH_URL") {
            config.search.base_url = url.trim().trim_end_matches('/').to_string();
        }

        if let Some(seconds) = parse_env::<u64>("SONGWIRE_SEARCH_TIMEOUT_SECS") {
            config.search.timeout = Duration::from_secs(seconds);
        }

        // Server configuration overrides
        if let Ok(host) = std::env::var("SONGWIRE_HOST") {
            config.server.host = host;
        }

        if let Some(port) = parse_env::<u16>("SONGWIRE_PORT") {
            config.server.port = port;
        }

        config
    }

    /// Checks that the configuration can drive a resolver.
    ///
    /// # Errors
    /// - `SongwireError::Configuration` - Zero timeouts, empty preferred format,
    ///   unusable search URL, or an invalid mirror registry
    pub fn validate(&self) -> Result<()> {
        if self.mirrors.attempt_timeout.is_zero() {
            return Err(SongwireError::Configuration {
                reason: "mirror attempt timeout must be non-zero".to_string(),
            });
        }

        if self.mirrors.preferred_format.trim().is_empty() {
            return Err(SongwireError::Configuration {
                reason: "preferred stream format must not be empty".to_string(),
            });
        }

        if self.search.timeout.is_zero() {
            return Err(SongwireError::Configuration {
                reason: "search timeout must be non-zero".to_string(),
            });
        }

        url::Url::parse(&self.search.base_url).map_err(|e| SongwireError::Configuration {
            reason: format!("invalid search URL '{}': {e}", self.search.base_url),
        })?;

        self.mirrors.registry().map(|_| ())
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring {name}={raw:?}: not a valid value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = SongwireConfig::default();

        assert_eq!(config.mirrors.endpoints.len(), 8);
        assert_eq!(config.mirrors.endpoints[0], "https://pipedapi.kavin.rocks");
        assert_eq!(config.mirrors.attempt_timeout, Duration::from_secs(3));
        assert_eq!(config.mirrors.preferred_format, "m4a");
        assert_eq!(config.search.base_url, "https://music.youtube.com");
        assert_eq!(config.server.bind_address(), "0.0.0.0:7860");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = SongwireConfig::default();
        config.mirrors.attempt_timeout = Duration::ZERO;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn test_duplicate_mirror_rejected() {
        let mut config = SongwireConfig::default();
        config.mirrors.endpoints = vec![
            "https://mirror.example".to_string(),
            "https://mirror.example/".to_string(),
        ];

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_preferred_format_rejected() {
        let mut config = SongwireConfig::default();
        config.mirrors.preferred_format = "  ".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_override() {
        unsafe {
            std::env::set_var(
                "SONGWIRE_MIRRORS",
                "https://a.example, https://b.example,,",
            );
            std::env::set_var("SONGWIRE_MIRROR_TIMEOUT_SECS", "5");
            std::env::set_var("SONGWIRE_PREFERRED_FORMAT", "webm");
            std::env::set_var("SONGWIRE_PORT", "not-a-port");
            std::env::set_var("SONGWIRE_SEARCH_URL", "http://127.0.0.1:9999/");
        }

        let config = SongwireConfig::from_env();

        assert_eq!(
            config.mirrors.endpoints,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.mirrors.attempt_timeout, Duration::from_secs(5));
        assert_eq!(config.mirrors.preferred_format, "webm");
        assert_eq!(config.server.port, 7860);
        assert_eq!(config.search.base_url, "http://127.0.0.1:9999");

        // Cleanup
        unsafe {
            std::env::remove_var("SONGWIRE_MIRRORS");
            std::env::remove_var("SONGWIRE_MIRROR_TIMEOUT_SECS");
            std::env::remove_var("SONGWIRE_PREFERRED_FORMAT");
            std::env::remove_var("SONGWIRE_PORT");
            std::env::remove_var("SONGWIRE_SEARCH_URL");
        }
    }
}
