//! Security middleware: CORS rules and request body limits.
//!
//! The session cookie flows require credentialed CORS, so wildcard
//! origins are never used; unset origins fall back to localhost for
//! development.

use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::Method;
use axum::http::header::{self, HeaderValue};
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;

/// Maximum accepted request body size. The API is JSON-only.
const MAX_BODY_SIZE: usize = 1024 * 1024;

/// CORS (Cross-Origin Resource Sharing) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct CorsConfig {
    /// List of allowed CORS origins.
    ///
    /// If empty, defaults to localhost origins for development.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "CORS_ORIGINS", value_delimiter = ',')
    )]
    pub allowed_origins: Vec<String>,

    /// Maximum age for CORS preflight requests in seconds.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "CORS_MAX_AGE", default_value = "3600")
    )]
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            max_age_seconds: 3600,
        }
    }
}

impl CorsConfig {
    /// Returns the CORS max age as a [`Duration`].
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_seconds)
    }

    /// Converts configured origins to a [`HeaderValue`] list, falling
    /// back to localhost origins for development.
    pub fn to_header_values(&self) -> Vec<HeaderValue> {
        if self.allowed_origins.is_empty() {
            vec![
                HeaderValue::from_static("http://localhost:3000"),
                HeaderValue::from_static("http://localhost:5173"),
                HeaderValue::from_static("http://127.0.0.1:3000"),
            ]
        } else {
            self.allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect()
        }
    }
}

/// Extension trait for `axum::`[`Router`] to apply security middleware.
pub trait RouterSecurityExt<S> {
    /// Layers CORS rules and request body limits.
    ///
    /// Credentials are always allowed because the browser surfaces
    /// authenticate with the session cookie.
    fn with_security(self, cors: &CorsConfig) -> Self;

    /// Layers security middleware with the default configuration.
    fn with_default_security(self) -> Self;
}

impl<S> RouterSecurityExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_security(self, cors: &CorsConfig) -> Self {
        let cors_layer = CorsLayer::new()
            .allow_origin(cors.to_header_values())
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
            .allow_credentials(true)
            .max_age(cors.max_age());

        self.layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
            .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
            .layer(cors_layer)
    }

    fn with_default_security(self) -> Self {
        self.with_security(&CorsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;

    use super::{CorsConfig, RouterSecurityExt};

    #[test]
    fn empty_origins_fall_back_to_localhost() {
        let config = CorsConfig::default();
        assert!(!config.to_header_values().is_empty());
    }

    #[test]
    fn invalid_origins_are_skipped() {
        let config = CorsConfig {
            allowed_origins: vec![
                "https://devicedecode.com".to_string(),
                "not a header value\u{0}".to_string(),
            ],
            ..CorsConfig::default()
        };

        assert_eq!(config.to_header_values().len(), 1);
    }

    #[test]
    fn layers_apply_to_router() {
        let _router: Router<()> = Router::new().with_default_security();
    }
}
