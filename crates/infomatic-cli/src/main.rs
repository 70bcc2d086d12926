#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use axum::Router;
use infomatic_server::handler::routes;
use infomatic_server::middleware::{
    RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt,
};
use infomatic_server::service::ServiceState;

use crate::config::Cli;

/// Tracing target for server startup events.
pub const TRACING_TARGET_SERVER_STARTUP: &str = "infomatic_cli::server::startup";

/// Tracing target for server shutdown events.
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "infomatic_cli::server::shutdown";

/// Tracing target for configuration events.
pub const TRACING_TARGET_CONFIG: &str = "infomatic_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.validate().context("invalid configuration")?;
    cli.log();

    let state = ServiceState::from_config(&cli.service)
        .await
        .context("failed to create service state")?;
    let router = create_router(state, &cli);

    server::serve(router, cli.server)
        .await
        .context("server terminated with an error")?;

    Ok(())
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Recovery (outermost) - catches panics and enforces timeouts
/// 2. Observability - request IDs and tracing spans
/// 3. Security - CORS and body limits
/// 4. Routes (innermost) - actual request handlers
fn create_router(state: ServiceState, cli: &Cli) -> Router {
    routes(state.clone())
        .with_state(state)
        .with_security(&cli.cors)
        .with_observability()
        .with_recovery(&cli.recovery)
}
