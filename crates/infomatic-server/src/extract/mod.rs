//! Custom request extractors.
//!
//! # Categories
//!
//! ## Session & guards
//!
//! - [`SessionToken`] - verified token claims, no database lookup
//! - [`AdminSession`] / [`EditorSession`] / [`CustomerSession`] - guards
//!   that re-check the principal row on every request
//! - [`SessionCookie`] - `Set-Cookie` builder for login and logout
//!
//! ## Request data
//!
//! - [`Json`] / [`ValidateJson`] / [`Path`] / [`Query`] - drop-in axum
//!   extractors rejecting with the service error type

pub mod reject;
pub mod session;

pub use crate::extract::reject::{Json, Path, Query, ValidateJson};
pub use crate::extract::session::{
    AdminSession, CustomerSession, EditorSession, PrincipalKind, SESSION_COOKIE, SessionClaims,
    SessionCookie, SessionToken, TRACING_TARGET_SESSION,
};
