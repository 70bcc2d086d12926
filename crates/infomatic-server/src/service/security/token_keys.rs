//! Signing material for session tokens.
//!
//! Tokens are signed with HMAC-SHA256 using a single shared secret. The
//! encoding and decoding keys are derived from the secret once at startup
//! and shared across the application state.

use std::fmt;
use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};

use crate::handler::{Error, ErrorKind};
use crate::{Error as ServiceError, Result as ServiceResult};

/// Tracing target for session token operations.
pub const TRACING_TARGET_TOKEN_KEYS: &str = "infomatic_server::service::token_keys";

/// Minimum accepted secret length in bytes.
///
/// HS256 secrets shorter than the hash output size weaken the MAC.
const MIN_SECRET_LEN: usize = 32;

/// Why a presented session token was rejected.
///
/// The three cases map to distinct HTTP error kinds so clients can
/// distinguish "sign in again" from "this token was never valid".
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The token was valid once but its expiry has passed.
    #[error("session token has expired")]
    Expired,
    /// The signature does not verify against the configured secret.
    #[error("session token signature is invalid")]
    BadSignature,
    /// The token is not a structurally valid JWT or carries bad claims.
    #[error("session token is malformed")]
    Malformed,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            JwtErrorKind::ExpiredSignature => Self::Expired,
            JwtErrorKind::InvalidSignature => Self::BadSignature,
            _ => Self::Malformed,
        }
    }
}

impl From<TokenError> for Error<'static> {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => ErrorKind::ExpiredAuthToken
                .with_message("Your session has expired")
                .with_context("Please sign in again to continue")
                .into_static(),
            TokenError::BadSignature => ErrorKind::Unauthorized
                .with_message("Authentication token is invalid")
                .into_static(),
            TokenError::Malformed => ErrorKind::MalformedAuthToken.into_error(),
        }
    }
}

/// Keys and lifetime settings used for session tokens.
///
/// Cheap to clone; the derived keys live behind an [`Arc`].
#[derive(Clone)]
pub struct TokenKeys {
    inner: Arc<TokenKeysInner>,
}

struct TokenKeysInner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    session_ttl_secs: i64,
}

impl TokenKeys {
    /// Signing algorithm used for all session tokens.
    pub const ALGORITHM: Algorithm = Algorithm::HS256;

    /// Derives token keys from a shared secret.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the secret is too short or the TTL
    /// is not positive.
    pub fn new(secret: &str, session_ttl_secs: i64) -> ServiceResult<Self> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(ServiceError::auth(format!(
                "session secret must be at least {} bytes",
                MIN_SECRET_LEN
            )));
        }

        if session_ttl_secs <= 0 {
            return Err(ServiceError::config(
                "session TTL must be a positive number of seconds",
            ));
        }

        tracing::debug!(
            target: TRACING_TARGET_TOKEN_KEYS,
            session_ttl_secs,
            "Derived session token keys from shared secret"
        );

        Ok(Self {
            inner: Arc::new(TokenKeysInner {
                encoding_key: EncodingKey::from_secret(secret.as_bytes()),
                decoding_key: DecodingKey::from_secret(secret.as_bytes()),
                session_ttl_secs,
            }),
        })
    }

    /// Returns the key used to sign tokens.
    #[inline]
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.inner.encoding_key
    }

    /// Returns the key used to verify tokens.
    #[inline]
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.inner.decoding_key
    }

    /// Returns the configured session lifetime in seconds.
    #[inline]
    pub fn session_ttl_secs(&self) -> i64 {
        self.inner.session_ttl_secs
    }
}

impl fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenKeys")
            .field("session_ttl_secs", &self.inner.session_ttl_secs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_secret() {
        assert!(TokenKeys::new("too-short", 3600).is_err());
    }

    #[test]
    fn rejects_non_positive_ttl() {
        let secret = "0123456789abcdef0123456789abcdef";
        assert!(TokenKeys::new(secret, 0).is_err());
        assert!(TokenKeys::new(secret, -5).is_err());
    }

    #[test]
    fn accepts_valid_config() {
        let secret = "0123456789abcdef0123456789abcdef";
        let keys = TokenKeys::new(secret, 86_400).unwrap();
        assert_eq!(keys.session_ttl_secs(), 86_400);
    }

    #[test]
    fn maps_jwt_error_kinds() {
        let expired =
            jsonwebtoken::errors::Error::from(jsonwebtoken::errors::ErrorKind::ExpiredSignature);
        assert_eq!(TokenError::from(expired), TokenError::Expired);

        let bad_sig =
            jsonwebtoken::errors::Error::from(jsonwebtoken::errors::ErrorKind::InvalidSignature);
        assert_eq!(TokenError::from(bad_sig), TokenError::BadSignature);

        let garbage =
            jsonwebtoken::errors::Error::from(jsonwebtoken::errors::ErrorKind::InvalidToken);
        assert_eq!(TokenError::from(garbage), TokenError::Malformed);
    }
}
