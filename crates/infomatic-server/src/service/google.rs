//! Google ID token verification for customer sign-in.
//!
//! Customers may sign in with a Google ID token obtained by the frontend.
//! The token is verified locally against Google's published JWKS: RS256
//! signature, audience equal to the configured OAuth client ID, and the
//! Google issuer. Unverified email addresses are rejected so an attacker
//! cannot claim an existing account through an unconfirmed Google profile.

use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::handler::{ErrorKind, Result};

/// Tracing target for Google sign-in operations.
pub const TRACING_TARGET_GOOGLE: &str = "infomatic_server::service::google";

/// Google's JWKS endpoint for ID token signing keys.
const GOOGLE_JWKS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";

/// Issuers Google uses for ID tokens.
const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// How long fetched signing keys are reused before refreshing.
const JWKS_CACHE_TTL: Duration = Duration::from_secs(3600);

/// A verified Google identity extracted from an ID token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleIdentity {
    /// Google's stable subject identifier for the account.
    pub subject: String,
    /// Verified email address, lowercase.
    pub email_address: String,
    /// Display name from the Google profile.
    pub display_name: String,
    /// Avatar URL from the Google profile, if present.
    pub avatar_url: Option<String>,
}

/// Claims carried in a Google ID token.
#[derive(Debug, Deserialize)]
struct GoogleClaims {
    sub: String,
    email: String,
    #[serde(default)]
    email_verified: bool,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

/// A single RSA signing key from Google's JWKS.
#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
}

#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

struct CachedJwks {
    fetched_at: Instant,
    keys: Vec<Jwk>,
}

/// Verifier for Google ID tokens with a cached key set.
///
/// Cheap to clone; the HTTP client and key cache are shared.
#[derive(Clone)]
pub struct GoogleVerifier {
    inner: Arc<GoogleVerifierInner>,
}

struct GoogleVerifierInner {
    client_id: String,
    http: reqwest::Client,
    jwks: RwLock<Option<CachedJwks>>,
}

impl GoogleVerifier {
    /// Creates a new verifier for the given OAuth client ID.
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(GoogleVerifierInner {
                client_id: client_id.into(),
                http: reqwest::Client::new(),
                jwks: RwLock::new(None),
            }),
        }
    }

    /// Verifies a Google ID token and extracts the identity it asserts.
    ///
    /// # Errors
    ///
    /// - `ErrorKind::Unauthorized` if the token fails signature, audience,
    ///   issuer, or expiry checks, or the email is not verified
    /// - `ErrorKind::InternalServerError` if the signing keys cannot be
    ///   fetched
    pub async fn verify(&self, id_token: &str) -> Result<GoogleIdentity> {
        let header = decode_header(id_token).map_err(|e| {
            tracing::debug!(
                target: TRACING_TARGET_GOOGLE,
                error = %e,
                "Google ID token header could not be parsed"
            );
            ErrorKind::Unauthorized
                .with_message("Google sign-in failed")
                .with_context("Invalid identity token")
                .into_static()
        })?;

        let kid = header.kid.ok_or_else(|| {
            ErrorKind::Unauthorized
                .with_message("Google sign-in failed")
                .with_context("Identity token is missing a key identifier")
                .into_static()
        })?;

        let jwk = self.signing_key(&kid).await?;
        let decoding_key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_GOOGLE,
                error = %e,
                kid = %kid,
                "Google JWKS entry could not be converted to a decoding key"
            );
            ErrorKind::InternalServerError.into_error()
        })?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = true;
        validation.set_audience(&[&self.inner.client_id]);
        validation.set_issuer(&GOOGLE_ISSUERS);
        validation.set_required_spec_claims(&["aud", "iss", "exp", "sub"]);

        let token_data = decode::<GoogleClaims>(id_token, &decoding_key, &validation)
            .map_err(|e| {
                tracing::debug!(
                    target: TRACING_TARGET_GOOGLE,
                    error = %e,
                    "Google ID token validation failed"
                );
                ErrorKind::Unauthorized
                    .with_message("Google sign-in failed")
                    .with_context("Identity token could not be verified")
                    .into_static()
            })?;

        let claims = token_data.claims;
        if !claims.email_verified {
            tracing::warn!(
                target: TRACING_TARGET_GOOGLE,
                subject = %claims.sub,
                "Google sign-in rejected: email address is not verified"
            );
            return Err(ErrorKind::Unauthorized
                .with_message("Google sign-in failed")
                .with_context("The Google account email is not verified")
                .into_static());
        }

        let email_address = claims.email.trim().to_lowercase();
        let display_name = claims
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| email_address.clone());

        Ok(GoogleIdentity {
            subject: claims.sub,
            email_address,
            display_name,
            avatar_url: claims.picture,
        })
    }

    /// Returns the signing key for `kid`, refreshing the JWKS if necessary.
    ///
    /// Google rotates keys, so a miss on the cached set forces one refetch
    /// before the token is rejected.
    async fn signing_key(&self, kid: &str) -> Result<Jwk> {
        {
            let cached = self.inner.jwks.read().await;
            if let Some(jwks) = cached.as_ref()
                && jwks.fetched_at.elapsed() < JWKS_CACHE_TTL
                && let Some(jwk) = jwks.keys.iter().find(|k| k.kid == kid)
            {
                return Ok(jwk.clone());
            }
        }

        let keys = self.fetch_jwks().await?;
        let found = keys.iter().find(|k| k.kid == kid).cloned();

        let mut cached = self.inner.jwks.write().await;
        *cached = Some(CachedJwks {
            fetched_at: Instant::now(),
            keys,
        });

        found.ok_or_else(|| {
            tracing::warn!(
                target: TRACING_TARGET_GOOGLE,
                kid = %kid,
                "Google ID token references an unknown signing key"
            );
            ErrorKind::Unauthorized
                .with_message("Google sign-in failed")
                .with_context("Identity token was signed with an unknown key")
                .into_static()
        })
    }

    async fn fetch_jwks(&self) -> Result<Vec<Jwk>> {
        let jwk_set: JwkSet = self
            .inner
            .http
            .get(GOOGLE_JWKS_URL)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET_GOOGLE,
                    error = %e,
                    "Failed to fetch Google signing keys"
                );
                ErrorKind::InternalServerError
                    .with_message("Google sign-in is temporarily unavailable")
                    .into_static()
            })?
            .json()
            .await
            .map_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET_GOOGLE,
                    error = %e,
                    "Failed to parse Google signing keys"
                );
                ErrorKind::InternalServerError
                    .with_message("Google sign-in is temporarily unavailable")
                    .into_static()
            })?;

        tracing::debug!(
            target: TRACING_TARGET_GOOGLE,
            key_count = jwk_set.keys.len(),
            "Fetched Google signing keys"
        );

        Ok(jwk_set.keys)
    }
}

/// Google sign-in feature handle.
///
/// Wraps the optional verifier so it can live in application state whether
/// or not a client ID was configured.
#[derive(Debug, Clone)]
pub struct GoogleSignIn {
    verifier: Option<GoogleVerifier>,
}

impl GoogleSignIn {
    /// Creates the feature handle.
    pub fn new(verifier: Option<GoogleVerifier>) -> Self {
        Self { verifier }
    }

    /// Returns whether Google sign-in is configured.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.verifier.is_some()
    }

    /// Returns the verifier, or a not-found error when the feature is off.
    pub fn verifier(&self) -> Result<&GoogleVerifier> {
        self.verifier.as_ref().ok_or_else(|| {
            ErrorKind::NotFound
                .with_message("Google sign-in is not available")
                .into_static()
        })
    }
}

impl std::fmt::Debug for GoogleVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleVerifier")
            .field("client_id", &self.inner.client_id)
            .finish_non_exhaustive()
    }
}
