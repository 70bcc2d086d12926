//! Super-admin session guard.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use derive_more::Deref;
use infomatic_postgres::PgClient;
use infomatic_postgres::model::SuperAdmin;
use infomatic_postgres::query::SuperAdminRepository;

use crate::extract::session::{PrincipalKind, SessionClaims, SessionToken, TRACING_TARGET_SESSION};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::TokenKeys;

/// Verified super-admin session.
///
/// Extraction proves the request carries a genuine admin token *and*
/// that the account still exists and is active. Token state is stale by
/// design, so the row is re-fetched on every request: deactivating an
/// admin takes effect immediately, not at token expiry.
#[derive(Debug, Clone, Deref)]
pub struct AdminSession {
    /// The current account row.
    #[deref]
    pub admin: SuperAdmin,
    /// Claims from the presented token.
    pub claims: SessionClaims,
}

impl AdminSession {
    /// Verifies token claims against the current account state.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::Forbidden`] if the token was minted for another
    ///   principal class, or the account has been deactivated
    /// - [`ErrorKind::Unauthorized`] if the account no longer exists
    pub async fn verify(claims: SessionClaims, pg_client: &PgClient) -> Result<Self> {
        claims.require_kind(PrincipalKind::Admin)?;

        let mut conn = pg_client.get_connection().await?;
        let admin = conn.find_super_admin_by_id(claims.principal_id).await?;

        let Some(admin) = admin else {
            tracing::warn!(
                target: TRACING_TARGET_SESSION,
                principal_id = %claims.principal_id,
                token_id = %claims.token_id,
                "Admin token references an account that no longer exists"
            );
            return Err(ErrorKind::Unauthorized
                .with_message("Account not found")
                .with_context("Your account may have been removed")
                .into_static());
        };

        if !admin.can_login() {
            tracing::warn!(
                target: TRACING_TARGET_SESSION,
                principal_id = %admin.id,
                "Admin session rejected: account is deactivated"
            );
            return Err(ErrorKind::Forbidden
                .with_message("Your account has been deactivated")
                .into_static());
        }

        Ok(Self { admin, claims })
    }
}

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
    PgClient: FromRef<S>,
    TokenKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(session) = parts.extensions.get::<Self>() {
            return Ok(session.clone());
        }

        let session_token = SessionToken::from_request_parts(parts, state).await?;
        let pg_client = PgClient::from_ref(state);
        let session = Self::verify(session_token.into_claims(), &pg_client).await?;

        parts.extensions.insert(session.clone());
        Ok(session)
    }
}
