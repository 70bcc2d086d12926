//! Application state, configuration, and shared services.

mod config;
mod google;
mod security;
mod state;

pub use crate::service::config::{ServiceConfig, ServiceConfigBuilder};
pub use crate::service::google::{
    GoogleIdentity, GoogleSignIn, GoogleVerifier, TRACING_TARGET_GOOGLE,
};
pub use crate::service::security::{
    PasswordHasher, TRACING_TARGET_TOKEN_KEYS, TokenError, TokenKeys,
};
pub use crate::service::state::{ServiceState, SessionSettings};
// Re-export error types from crate root for convenience
pub use crate::{Error, Result};
