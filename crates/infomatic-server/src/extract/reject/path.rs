//! Path extractor with handler-native rejections.

use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequestParts, Path as AxumPath};
use axum::http::request::Parts;
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;

use crate::handler::{Error, ErrorKind};

/// Drop-in replacement for [`axum::extract::Path`] whose rejection is
/// the service error type. An identifier that fails to parse is a `400`
/// rather than axum's default plain-text response.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Path<T>(pub T);

impl<T> Path<T> {
    /// Returns the inner value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let extractor = <AxumPath<T> as FromRequestParts<S>>::from_request_parts(parts, state);
        extractor.await.map(|path| Self(path.0)).map_err(Into::into)
    }
}

impl From<PathRejection> for Error<'static> {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            PathRejection::FailedToDeserializePathParams(err) => ErrorKind::BadRequest
                .with_message("Invalid path parameter")
                .with_context(err.body_text())
                .into_static(),
            PathRejection::MissingPathParams(_) => ErrorKind::InternalServerError
                .with_message("Route is missing a path parameter")
                .into_static(),
            _ => ErrorKind::InternalServerError
                .with_message("Request processing failed")
                .into_static(),
        }
    }
}
