//! Customer session guard.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use derive_more::Deref;
use infomatic_postgres::PgClient;
use infomatic_postgres::model::Customer;
use infomatic_postgres::query::CustomerRepository;

use crate::extract::session::{PrincipalKind, SessionClaims, SessionToken, TRACING_TARGET_SESSION};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::TokenKeys;

/// Verified customer session.
///
/// Customers have no deactivation flag; the guard only requires that
/// the account still exists. Each verified request also stamps
/// `last_active_at` as telemetry, and a failure there never fails the
/// guarded request.
#[derive(Debug, Clone, Deref)]
pub struct CustomerSession {
    /// The current account row.
    #[deref]
    pub customer: Customer,
    /// Claims from the presented token.
    pub claims: SessionClaims,
}

impl CustomerSession {
    /// Verifies token claims against the current account state.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::Forbidden`] if the token was minted for another
    ///   principal class
    /// - [`ErrorKind::Unauthorized`] if the account no longer exists
    pub async fn verify(claims: SessionClaims, pg_client: &PgClient) -> Result<Self> {
        claims.require_kind(PrincipalKind::Customer)?;

        let mut conn = pg_client.get_connection().await?;
        let customer = conn.find_customer_by_id(claims.principal_id).await?;

        let Some(customer) = customer else {
            tracing::warn!(
                target: TRACING_TARGET_SESSION,
                principal_id = %claims.principal_id,
                token_id = %claims.token_id,
                "Customer token references an account that no longer exists"
            );
            return Err(ErrorKind::Unauthorized
                .with_message("Account not found")
                .with_context("Your account may have been removed")
                .into_static());
        };

        if let Err(error) = conn.touch_customer_activity(customer.id).await {
            tracing::debug!(
                target: TRACING_TARGET_SESSION,
                principal_id = %customer.id,
                error = %error,
                "Failed to stamp customer activity"
            );
        }

        Ok(Self { customer, claims })
    }
}

impl<S> FromRequestParts<S> for CustomerSession
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
