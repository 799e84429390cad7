//! HTTP server wiring for Songwire
//!
//! Builds the router over shared resolver state and runs it until the
//! process receives Ctrl-C.

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::routing::get;
use chrono::{DateTime, Utc};
use songwire_core::{MirrorPool, SongwireConfig};
use songwire_search::IdentifierResolver;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::errors::ServerError;
use crate::handlers::{health, status, stream};

/// Shared state handed to every handler.
///
/// Both resolvers are read-only after startup, so the state is cheap to
/// clone per request.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Maps free-text queries to canonical identifiers
    pub identifier_resolver: Arc<IdentifierResolver>,
    /// Maps canonical identifiers to stream URLs
    pub mirror_pool: Arc<MirrorPool>,
    /// Monotonic start time for uptime
    pub started_at: Instant,
    /// Wall-clock start time reported by the status endpoint
    pub started_at_utc: DateTime<Utc>,
}

impl AppState {
    /// Creates state from already-built resolvers.
    pub fn new(identifier_resolver: IdentifierResolver, mirror_pool: MirrorPool) -> Self {
        Self {
            identifier_resolver: Arc::new(identifier_resolver),
            mirror_pool: Arc::new(mirror_pool),
            started_at: Instant::now(),
            started_at_utc: Utc::now(),
        }
    }

    /// Builds production resolvers from configuration.
    ///
    /// # Errors
    /// - `ServerError::Setup` - Invalid configuration or HTTP client failure
    pub fn from_config(config: &SongwireConfig) -> Result<Self, ServerError> {
        config.validate().map_err(|e| ServerError::Setup {
            reason: e.user_message(),
        })?;

        let identifier_resolver =
            IdentifierResolver::from_config(&config.search).map_err(|e| ServerError::Setup {
                reason: e.to_string(),
            })?;
        let mirror_pool =
            MirrorPool::from_config(&config.mirrors).map_err(|e| ServerError::Setup {
                reason: e.to_string(),
            })?;

        Ok(Self::new(identifier_resolver, mirror_pool))
    }
}

/// Builds the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/health", get(health))
        .route("/stream", get(stream))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves the router on an already-bound listener until it fails.
///
/// # Errors
/// - `ServerError::Serve` - Listener I/O failure
pub async fn serve(listener: TcpListener, state: AppState) -> Result<(), ServerError> {
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

/// Starts the HTTP service with the given configuration.
///
/// # Errors
/// - `ServerError::Setup` - Invalid configuration
/// - `ServerError::Bind` - Address already in use or not permitted
/// - `ServerError::Serve` - Listener I/O failure
pub async fn run_server(config: SongwireConfig) -> Result<(), ServerError> {
    let state = AppState::from_config(&config)?;
    let address = config.server.bind_address();

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;

    tracing::info!(
        "Songwire running on http://{} with {} mirrors",
        address,
        state.mirror_pool.registry().len()
    );

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Songwire stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
