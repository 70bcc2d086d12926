//! HTTPS server startup backed by axum-server with rustls.

use axum::Router;
use axum_server::Handle;
use axum_server::tls_rustls::RustlsConfig;

use crate::config::ServerConfig;
use crate::server::{
    Result, ServerError, TRACING_TARGET_SHUTDOWN, TRACING_TARGET_STARTUP, shutdown_signal,
};

/// Starts an HTTPS server with graceful shutdown.
///
/// Requires both certificate and key paths to be configured; the
/// configuration validator enforces that they arrive together.
pub async fn serve_https(app: Router, server_config: ServerConfig) -> Result<()> {
    if let Err(validation_error) = server_config.validate() {
        tracing::error!(
            target: TRACING_TARGET_STARTUP,
            error = %validation_error,
            "Invalid server configuration"
        );

        return Err(ServerError::InvalidConfig(validation_error.to_string()));
    }

    let (Some(cert_path), Some(key_path)) =
        (&server_config.tls_cert_path, &server_config.tls_key_path)
    else {
        return Err(ServerError::TlsCertificate(
            "TLS certificate and key paths are required for HTTPS".to_string(),
        ));
    };

    let rustls_config = RustlsConfig::from_pem_file(cert_path, key_path)
        .await
        .map_err(|err| ServerError::TlsCertificate(err.to_string()))?;

    let server_addr = server_config.server_addr();

    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        addr = %server_addr,
        "HTTPS server is ready and listening for connections"
    );

    if server_config.binds_to_all_interfaces() {
        tracing::warn!(
            target: TRACING_TARGET_STARTUP,
            "Server is bound to all interfaces. Ensure firewall rules are properly configured."
        );
    }

    let handle = Handle::new();
    let shutdown_timeout = server_config.shutdown_timeout();
    tokio::spawn({
        let handle = handle.clone();
        async move {
            shutdown_signal(shutdown_timeout).await;
            handle.graceful_shutdown(Some(shutdown_timeout));
        }
    });

    axum_server::bind_rustls(server_addr, rustls_config)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .map_err(|err| {
            tracing::error!(
                target: TRACING_TARGET_SHUTDOWN,
                error = %err,
                "Server encountered an error"
            );
            ServerError::Runtime(err)
        })?;

    tracing::info!(
        target: TRACING_TARGET_SHUTDOWN,
        "Server shut down gracefully"
    );
    Ok(())
}
