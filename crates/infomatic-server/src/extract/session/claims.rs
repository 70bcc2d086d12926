//! Session token claims.
//!
//! A session token asserts a principal identifier and which class of
//! principal it belongs to. The class is carried in a private `knd` claim
//! so a token minted for one surface can never pass a guard on another.

use jiff::{Span, Timestamp};
use jsonwebtoken::{Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extract::session::TRACING_TARGET_SESSION;
use crate::handler::{ErrorKind, Result};
use crate::service::{TokenError, TokenKeys};

/// The class of principal a session token was minted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PrincipalKind {
    /// Super-admin signed in through the dashboard.
    Admin,
    /// Editor account with per-section permissions.
    Editor,
    /// Public customer account.
    Customer,
}

/// JWT claims for a session token.
///
/// # Claims
///
/// | Claim | Field | Description |
/// |-------|-------|-------------|
/// | `iss` | `issued_by` | Token issuer identifier |
/// | `aud` | `audience` | Token audience identifier |
/// | `jti` | `token_id` | Unique token identifier |
/// | `sub` | `principal_id` | Principal the token represents |
/// | `knd` | `principal_kind` | Principal class (private claim) |
/// | `email` | `email_address` | Sign-in email, when one exists |
/// | `iat` | `issued_at` | Creation time, unix seconds |
/// | `exp` | `expires_at` | Expiration time, unix seconds |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Issuer (who created the token).
    #[serde(rename = "iss")]
    issued_by: String,
    /// Audience (who the token is intended for).
    #[serde(rename = "aud")]
    audience: String,

    /// JWT ID (unique identifier for this token).
    #[serde(rename = "jti")]
    pub token_id: Uuid,
    /// Subject (identifier of the signed-in principal).
    #[serde(rename = "sub")]
    pub principal_id: Uuid,
    /// Principal class this token was minted for.
    #[serde(rename = "knd")]
    pub principal_kind: PrincipalKind,
    /// Email address the principal signed in with, if any. Editors sign
    /// in by username, so their tokens omit it.
    #[serde(rename = "email", default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,

    /// Issued at (unix seconds).
    #[serde(rename = "iat")]
    #[serde(with = "jiff::fmt::serde::timestamp::second::required")]
    pub issued_at: Timestamp,
    /// Expiration time (unix seconds).
    #[serde(rename = "exp")]
    #[serde(with = "jiff::fmt::serde::timestamp::second::required")]
    pub expires_at: Timestamp,
}

impl SessionClaims {
    /// JWT issuer identifier for session tokens.
    const JWT_ISSUER: &str = "infomatic";
    /// JWT audience identifier for session tokens.
    const JWT_AUDIENCE: &str = "infomatic:server";

    /// Creates fresh claims for a principal with the given lifetime.
    ///
    /// Timestamps are truncated to whole seconds up front so the in-memory
    /// claims match what `iat`/`exp` carry on the wire, and so the expiry
    /// reported to clients is the token's real expiry.
    pub fn new(principal_id: Uuid, principal_kind: PrincipalKind, ttl_secs: i64) -> Self {
        let issued_at = Timestamp::now();
        let issued_at = Timestamp::from_second(issued_at.as_second()).unwrap_or(issued_at);
        let expires_at = issued_at
            .checked_add(Span::new().seconds(ttl_secs))
            .unwrap_or(Timestamp::MAX);

        Self {
            issued_by: Self::JWT_ISSUER.to_owned(),
            audience: Self::JWT_AUDIENCE.to_owned(),
            token_id: Uuid::new_v4(),
            principal_id,
            principal_kind,
            email_address: None,
            issued_at,
            expires_at,
        }
    }

    /// Records the email address the principal signed in with.
    #[must_use]
    pub fn with_email(mut self, email_address: impl Into<String>) -> Self {
        self.email_address = Some(email_address.into());
        self
    }

    /// Checks whether the expiration time has passed.
    #[inline]
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Timestamp::now()
    }

    /// Requires that this token was minted for the given principal class.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Forbidden`] on a mismatch. A valid customer
    /// token presented to the dashboard is authentication that succeeded
    /// for the wrong audience, not a broken token.
    pub fn require_kind(&self, expected: PrincipalKind) -> Result<()> {
        if self.principal_kind != expected {
            tracing::warn!(
                target: TRACING_TARGET_SESSION,
                token_id = %self.token_id,
                principal_id = %self.principal_id,
                presented = %self.principal_kind,
                expected = %expected,
                "Session token presented to a surface it was not minted for"
            );
            return Err(ErrorKind::Forbidden
                .with_message("This session cannot access this area")
                .into_static());
        }

        Ok(())
    }

    /// Signs the claims into a compact JWT.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InternalServerError`] if encoding fails.
    pub fn encode(&self, token_keys: &TokenKeys) -> Result<String> {
        let header = Header::new(TokenKeys::ALGORITHM);
        encode(&header, self, token_keys.encoding_key()).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_SESSION,
                error = %e,
                principal_id = %self.principal_id,
                "Failed to sign session token"
            );
            ErrorKind::InternalServerError
                .with_message("Session token generation failed")
                .into_static()
        })
    }

    /// Verifies a compact JWT and returns the claims it carries.
    ///
    /// Validation covers the signature, expiry, issuer, and the presence
    /// of every registered claim this service mints.
    pub fn decode(token: &str, token_keys: &TokenKeys) -> Result<Self, TokenError> {
        let mut validation = Validation::new(TokenKeys::ALGORITHM);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.validate_aud = true;
        validation.set_audience(&[Self::JWT_AUDIENCE]);
        validation.set_issuer(&[Self::JWT_ISSUER]);
        validation.set_required_spec_claims(&["iss", "aud", "jti", "sub", "iat", "exp"]);

        let token_data = decode::<Self>(token, token_keys.decoding_key(), &validation)
            .map_err(|e| {
                tracing::debug!(
                    target: TRACING_TARGET_SESSION,
                    error = %e,
                    "Session token failed validation"
                );
                TokenError::from(e)
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> TokenKeys {
        TokenKeys::new("0123456789abcdef0123456789abcdef", 3600).unwrap()
    }

    #[test]
    fn round_trips_signed_claims() {
        let keys = keys();
        let claims = SessionClaims::new(Uuid::new_v4(), PrincipalKind::Editor, 3600);

        let token = claims.encode(&keys).unwrap();
        let decoded = SessionClaims::decode(&token, &keys).unwrap();

        assert_eq!(decoded, claims);
        assert!(!decoded.is_expired());
    }

    #[test]
    fn fresh_claims_use_whole_second_timestamps() {
        let claims = SessionClaims::new(Uuid::new_v4(), PrincipalKind::Customer, 3600);
        assert_eq!(claims.issued_at.subsec_nanosecond(), 0);
        assert_eq!(claims.expires_at.subsec_nanosecond(), 0);
    }

    #[test]
    fn rejects_expired_token() {
        let keys = keys();
        let mut claims = SessionClaims::new(Uuid::new_v4(), PrincipalKind::Admin, 3600);
        claims.issued_at = Timestamp::now() - Span::new().hours(2);
        claims.expires_at = Timestamp::now() - Span::new().hours(1);

        let token = claims.encode(&keys).unwrap();
        let error = SessionClaims::decode(&token, &keys).unwrap_err();
        assert_eq!(error, TokenError::Expired);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let other = TokenKeys::new("ffffffffffffffffffffffffffffffff", 3600).unwrap();
        let claims = SessionClaims::new(Uuid::new_v4(), PrincipalKind::Customer, 3600);

        let token = claims.encode(&other).unwrap();
        let error = SessionClaims::decode(&token, &keys()).unwrap_err();
        assert_eq!(error, TokenError::BadSignature);
    }

    #[test]
    fn rejects_garbage_token() {
        let error = SessionClaims::decode("not.a.jwt", &keys()).unwrap_err();
        assert_eq!(error, TokenError::Malformed);
    }

    #[test]
    fn kind_mismatch_is_forbidden() {
        let claims = SessionClaims::new(Uuid::new_v4(), PrincipalKind::Customer, 3600);

        assert!(claims.require_kind(PrincipalKind::Customer).is_ok());
        let error = claims.require_kind(PrincipalKind::Admin).unwrap_err();
        assert_eq!(error.kind().status_code(), axum::http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn claims_serialize_with_short_names() {
        let claims = SessionClaims::new(Uuid::new_v4(), PrincipalKind::Editor, 60);
        let value = serde_json::to_value(&claims).unwrap();

        assert_eq!(value["knd"], "editor");
        assert!(value["iat"].is_number());
        assert!(value["exp"].is_number());
        assert_eq!(value["sub"], claims.principal_id.to_string());
        assert!(value.get("email").is_none());
    }

    #[test]
    fn email_claim_is_carried_when_set() {
        let claims = SessionClaims::new(Uuid::new_v4(), PrincipalKind::Admin, 60)
            .with_email("root@example.com");
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["email"], "root@example.com");
    }
}
