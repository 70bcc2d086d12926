//! Shutdown signal wiring.
//!
//! The server drains in-flight requests once a stop signal arrives; the
//! timeout bounds how long the drain may take.

use std::time::Duration;

use super::TRACING_TARGET_SHUTDOWN;

/// Resolves when the process is asked to stop.
///
/// Listens for Ctrl+C everywhere and additionally for SIGTERM on unix,
/// so container runtimes that stop pods with SIGTERM get a clean drain
/// as well.
pub async fn shutdown_signal(shutdown_timeout: Duration) {
    let interrupt = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!(
                target: TRACING_TARGET_SHUTDOWN,
                "Ctrl+C received, draining connections"
            ),
            Err(error) => tracing::error!(
                target: TRACING_TARGET_SHUTDOWN,
                %error,
                "Ctrl+C handler could not be installed"
            ),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                tracing::info!(
                    target: TRACING_TARGET_SHUTDOWN,
                    "SIGTERM received, draining connections"
                );
            }
            Err(error) => tracing::error!(
                target: TRACING_TARGET_SHUTDOWN,
                %error,
                "SIGTERM handler could not be installed"
            ),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => {}
        () = terminate => {}
    }

    tracing::info!(
        target: TRACING_TARGET_SHUTDOWN,
        drain_timeout_secs = shutdown_timeout.as_secs(),
        "Shutdown started"
    );
}
