//! Session extraction and per-surface guards.
//!
//! [`SessionToken`] verifies the signed token carried by the request.
//! [`AdminSession`], [`EditorSession`], and [`CustomerSession`] build on
//! it: each checks the token was minted for its principal class and
//! re-fetches the account row so revocation applies immediately.

mod admin;
mod claims;
mod customer;
mod editor;
mod token;

/// Tracing target for session verification.
pub const TRACING_TARGET_SESSION: &str = "infomatic_server::extract::session";

pub use crate::extract::session::admin::AdminSession;
pub use crate::extract::session::claims::{PrincipalKind, SessionClaims};
pub use crate::extract::session::customer::CustomerSession;
pub use crate::extract::session::editor::EditorSession;
pub use crate::extract::session::token::{SESSION_COOKIE, SessionCookie, SessionToken};
