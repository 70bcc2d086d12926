//! Session token transport.
//!
//! Browsers carry the session as an `HttpOnly` cookie named `token`;
//! API clients may instead send an `Authorization: Bearer` header. The
//! cookie takes precedence when both are present.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use axum_extra::typed_header::TypedHeaderRejectionReason;
use cookie::time::Duration as CookieDuration;
use derive_more::Deref;

use crate::extract::session::SessionClaims;
use crate::handler::{Error, ErrorKind, Result};
use crate::service::{SessionSettings, TokenKeys};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "token";

/// Verified session claims extracted from the request.
///
/// Extraction only proves the token is genuine and unexpired. It does not
/// consult the database; the per-surface guards do that on top of this.
#[derive(Debug, Clone, Deref, PartialEq, Eq)]
pub struct SessionToken(pub SessionClaims);

impl SessionToken {
    /// Consumes the extractor and returns the claims.
    #[inline]
    pub fn into_claims(self) -> SessionClaims {
        self.0
    }
}

impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
    TokenKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Return cached claims to avoid verifying the token twice
        if let Some(session_token) = parts.extensions.get::<Self>() {
            return Ok(session_token.clone());
        }

        let token_keys = TokenKeys::from_ref(state);
        let raw_token = raw_session_token(parts, state).await?;
        let claims = SessionClaims::decode(&raw_token, &token_keys)?;

        let session_token = Self(claims);
        parts.extensions.insert(session_token.clone());
        Ok(session_token)
    }
}

/// Pulls the raw compact JWT from the cookie jar or the Bearer header.
async fn raw_session_token<S>(parts: &mut Parts, state: &S) -> Result<String>
where
    S: Send + Sync,
{
    let jar = CookieJar::from_headers(&parts.headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Ok(cookie.value().to_owned());
    }

    type BearerHeader = TypedHeader<Authorization<Bearer>>;
    match BearerHeader::from_request_parts(parts, state).await {
        Ok(bearer_header) => Ok(bearer_header.token().to_owned()),
        Err(rejection) => match rejection.reason() {
            TypedHeaderRejectionReason::Missing => Err(ErrorKind::MissingAuthToken
                .with_message("Authentication required")
                .with_context("Provide a session cookie or a Bearer token")
                .into_static()),
            _ => Err(ErrorKind::MalformedAuthToken
                .with_message("Invalid token format")
                .with_context("Authorization header must contain a valid Bearer token")
                .into_static()),
        },
    }
}

/// Builder for `Set-Cookie` values carrying the session token.
#[derive(Debug, Clone, Copy)]
pub struct SessionCookie;

impl SessionCookie {
    /// Builds a session cookie holding a freshly signed token.
    ///
    /// The cookie is `HttpOnly` and `SameSite=Lax`, scoped to the whole
    /// site, and lives as long as the token itself.
    pub fn bearer(token: String, settings: &SessionSettings) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token))
            .http_only(true)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(CookieDuration::seconds(settings.ttl_secs))
            .secure(settings.cookie_secure)
            .build()
    }

    /// Builds a removal cookie that clears the session on sign-out.
    ///
    /// Attributes must match the ones used when the cookie was set, or
    /// browsers keep the original.
    pub fn removal(settings: &SessionSettings) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, ""))
            .http_only(true)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(CookieDuration::ZERO)
            .secure(settings.cookie_secure)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> SessionSettings {
        SessionSettings {
            ttl_secs: 3600,
            cookie_secure: true,
        }
    }

    #[test]
    fn session_cookie_attributes() {
        let cookie = SessionCookie::bearer("signed-token".to_owned(), &settings());

        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "signed-token");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(CookieDuration::seconds(3600)));
        assert_eq!(cookie.secure(), Some(true));
    }

    #[test]
    fn insecure_setting_drops_secure_attribute() {
        let settings = SessionSettings {
            ttl_secs: 60,
            cookie_secure: false,
        };
        let cookie = SessionCookie::bearer("signed-token".to_owned(), &settings);
        assert_eq!(cookie.secure(), Some(false));
    }

    #[test]
    fn removal_cookie_expires_immediately() {
        let cookie = SessionCookie::removal(&settings());

        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
        assert_eq!(cookie.http_only(), Some(true));
    }
}
