//! Authentication middleware for whole router subtrees.
//!
//! Handlers that need the account row take the session extractors
//! directly; these middleware exist for routes that only need the gate.
//! The extractors cache their result in request extensions, so a
//! middleware plus a handler extractor costs one database lookup, not
//! two.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::extract::{AdminSession, CustomerSession, EditorSession};

/// Requires a valid super-admin session to proceed with the request.
///
/// #### Examples
///
/// ```rust,no_run
/// use axum::extract::Request;
/// use axum::middleware::{from_fn_with_state, FromFnLayer};
/// use infomatic_server::extract::AdminSession;
/// use infomatic_server::middleware::require_admin;
/// use infomatic_server::service::{ServiceConfig, ServiceState};
///
/// # async fn demo() -> infomatic_server::Result<()> {
/// let state = ServiceState::from_config(&ServiceConfig::default()).await?;
/// let _guard: FromFnLayer<_, _, (AdminSession, Request)> =
///     from_fn_with_state(state, require_admin);
/// # Ok(())
/// # }
/// ```
pub async fn require_admin(_: AdminSession, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// Requires a valid editor session to proceed with the request.
///
/// Per-section authorization still happens in the handler; this only
/// proves the caller is an active editor.
pub async fn require_editor(_: EditorSession, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// Requires a valid customer session to proceed with the request.
pub async fn require_customer(_: CustomerSession, request: Request, next: Next) -> Response {
    next.run(request).await
}
