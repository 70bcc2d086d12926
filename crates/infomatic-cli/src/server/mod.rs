//! HTTP/HTTPS server startup with graceful shutdown.
//!
//! Protocol selection is a compile-time decision: the `tls` feature swaps
//! the plain HTTP listener for an axum-server rustls listener.

/// Tracing target for server startup events.
pub const TRACING_TARGET_STARTUP: &str = "infomatic_cli::server::startup";

/// Tracing target for server shutdown events.
pub const TRACING_TARGET_SHUTDOWN: &str = "infomatic_cli::server::shutdown";

mod error;
#[cfg(not(feature = "tls"))]
mod http_server;
#[cfg(feature = "tls")]
mod https_server;
mod shutdown;

use axum::Router;
pub use error::{Result, ServerError};
#[cfg(not(feature = "tls"))]
use http_server::serve_http;
#[cfg(feature = "tls")]
use https_server::serve_https;
use shutdown::shutdown_signal;

use crate::config::ServerConfig;

/// Starts a server with automatic protocol selection based on features.
///
/// # Errors
///
/// Returns an error if:
/// - The server configuration is invalid
/// - TLS certificates cannot be loaded (HTTPS mode)
/// - The address/port cannot be bound
/// - The server encounters a fatal error during operation
pub async fn serve(app: Router, config: ServerConfig) -> Result<()> {
    #[cfg(feature = "tls")]
    let outcome = serve_https(app, config).await;

    #[cfg(not(feature = "tls"))]
    let outcome = serve_http(app, config).await;

    if let Err(error) = &outcome
        && let Some(suggestion) = error.suggestion()
    {
        tracing::warn!(
            target: TRACING_TARGET_STARTUP,
            suggestion,
            "A likely remedy exists for this failure"
        );
    }

    outcome
}
