//! Editor session guard with per-section authorization.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use derive_more::Deref;
use infomatic_postgres::PgClient;
use infomatic_postgres::model::Editor;
use infomatic_postgres::query::EditorRepository;
use infomatic_postgres::types::ContentRoute;

use crate::extract::session::{PrincipalKind, SessionClaims, SessionToken, TRACING_TARGET_SESSION};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::TokenKeys;

/// Verified editor session.
///
/// The account row is re-fetched on every request so permission edits
/// and deactivation apply to tokens that are already in the wild.
#[derive(Debug, Clone, Deref)]
pub struct EditorSession {
    /// The current account row, including granted sections.
    #[deref]
    pub editor: Editor,
    /// Claims from the presented token.
    pub claims: SessionClaims,
}

impl EditorSession {
    /// Verifies token claims against the current account state.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::Forbidden`] if the token was minted for another
    ///   principal class, or the account has been deactivated
    /// - [`ErrorKind::Unauthorized`] if the account no longer exists
    pub async fn verify(claims: SessionClaims, pg_client: &PgClient) -> Result<Self> {
        claims.require_kind(PrincipalKind::Editor)?;

        let mut conn = pg_client.get_connection().await?;
        let editor = conn.find_editor_by_id(claims.principal_id).await?;

        let Some(editor) = editor else {
            tracing::warn!(
                target: TRACING_TARGET_SESSION,
                principal_id = %claims.principal_id,
                token_id = %claims.token_id,
                "Editor token references an account that no longer exists"
            );
            return Err(ErrorKind::Unauthorized
                .with_message("Account not found")
                .with_context("Your account may have been removed")
                .into_static());
        };

        if !editor.can_login() {
            tracing::warn!(
                target: TRACING_TARGET_SESSION,
                principal_id = %editor.id,
                username = %editor.username,
                "Editor session rejected: account is deactivated"
            );
            return Err(ErrorKind::Forbidden
                .with_message("Your account has been deactivated")
                .into_static());
        }

        Ok(Self { editor, claims })
    }

    /// Requires that this editor is granted the given content section.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Forbidden`] naming the denied section.
    pub fn authorize(&self, route: ContentRoute) -> Result<()> {
        if !self.editor.is_authorized(route) {
            tracing::warn!(
                target: TRACING_TARGET_SESSION,
                principal_id = %self.editor.id,
                username = %self.editor.username,
                route = %route,
                "Editor denied access to a section outside their grants"
            );
            return Err(ErrorKind::Forbidden
                .with_message("You do not have access to this section")
                .with_resource(route.to_string())
                .into_static());
        }

        Ok(())
    }
}

impl<S> FromRequestParts<S> for EditorSession
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
