//! CLI configuration management.
//!
//! The complete configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── server: ServerConfig     # Host, port, TLS, shutdown
//! ├── service: ServiceConfig   # Database, session secret, Google OAuth
//! ├── cors: CorsConfig         # Allowed origins for browser clients
//! └── recovery: RecoveryConfig # Request timeout
//! ```
//!
//! All values can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! # Configure database and server
//! infomatic-cli --postgres-url "postgresql://..." --port 8080
//!
//! # Or via environment variables
//! POSTGRES_URL="postgresql://..." PORT=8080 JWT_SECRET="..." infomatic-cli
//! ```

mod server;

use std::process;

use anyhow::Context;
use clap::Parser;
use infomatic_server::middleware::{CorsConfig, RecoveryConfig};
use infomatic_server::service::ServiceConfig;
use serde::{Deserialize, Serialize};
pub use server::ServerConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_SERVER_STARTUP};

/// Complete CLI configuration.
///
/// Combines all configuration groups for the Infomatic server:
/// - [`ServerConfig`]: Network binding, TLS, and shutdown behavior
/// - [`ServiceConfig`]: Postgres, session signing, and Google sign-in
/// - [`CorsConfig`]: Allowed origins for the browser frontends
/// - [`RecoveryConfig`]: Request timeout enforcement
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "infomatic")]
#[command(about = "Infomatic tech-review content platform server")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// External service configuration (database, auth secrets).
    #[clap(flatten)]
    pub service: ServiceConfig,

    /// CORS configuration for browser clients.
    #[clap(flatten)]
    pub cors: CorsConfig,

    /// Recovery configuration (request timeouts).
    #[clap(flatten)]
    pub recovery: RecoveryConfig,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses
    /// CLI arguments.
    ///
    /// This is the preferred way to initialize the CLI configuration: .env
    /// files are loaded before clap parses arguments, so environment
    /// variables from .env can be used as defaults.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is
    /// enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;
        Ok(())
    }

    /// Logs configuration at startup (no sensitive information).
    pub fn log(&self) {
        Self::log_build_info();
        self.server.log();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            postgres_max_connections = self.service.postgres_max_connections,
            postgres_connection_timeout_secs = self.service.postgres_connection_timeout_secs,
            session_ttl_secs = self.service.session_ttl_secs,
            cookie_secure = self.service.cookie_secure,
            google_sign_in = self.service.google_client_id.is_some(),
            cors_origins = ?self.cors.allowed_origins,
            request_timeout_secs = self.recovery.request_timeout_secs,
            "Service configuration"
        );
    }

    /// Logs build information at debug level.
    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [
            cfg!(feature = "tls").then_some("tls"),
            cfg!(feature = "dotenv").then_some("dotenv"),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
