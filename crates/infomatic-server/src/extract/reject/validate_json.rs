//! JSON extractor that also runs `validator` rules.

use axum::extract::{FromRequest, Request};
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::extract::reject::Json;
use crate::handler::{Error, ErrorKind};

/// JSON extractor that validates the deserialized value.
///
/// Works with any type implementing both [`serde::Deserialize`] and
/// [`Validate`]; failed rules become a `400` with the offending fields
/// named in the message.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct ValidateJson<T>(pub T);

impl<T> ValidateJson<T> {
    /// Returns the inner validated value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = <Json<T> as FromRequest<S>>::from_request(req, state).await?;
        data.validate()?;
        Ok(Self(data))
    }
}

/// Builds a field-level message for a single failed rule.
fn format_validation_error(field: &str, error: &validator::ValidationError) -> String {
    if let Some(custom_message) = &error.message {
        return format!("Field '{}': {}", field, custom_message);
    }

    let message = match error.code.as_ref() {
        "required" => "is required and cannot be empty",
        "length" => "has invalid length",
        "email" => "must be a valid email address",
        "range" => "is out of valid range",
        "url" => "must be a valid URL",
        "regex" => "has an invalid format",
        code => return format!("Field '{}' failed validation: {}", field, code),
    };

    format!("Field '{}' {}", field, message)
}

impl From<ValidationErrors> for Error<'static> {
    fn from(errors: ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, field_errors)| {
                field_errors
                    .iter()
                    .map(move |error| format_validation_error(field, error))
            })
            .collect();

        let user_message = match messages.as_slice() {
            [] => "Validation failed".to_owned(),
            [single] => single.clone(),
            multiple => multiple.join(". "),
        };

        tracing::warn!(
            errors = ?errors.field_errors(),
            "Request validation failed"
        );

        ErrorKind::BadRequest
            .with_message(user_message)
            .with_resource("request")
            .into_static()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Debug, serde::Deserialize, Validate)]
    struct SignupBody {
        #[validate(email)]
        email: String,
        #[validate(length(min = 8))]
        password: String,
    }

    #[test]
    fn validation_errors_become_bad_request() {
        let body = SignupBody {
            email: "not-an-email".to_owned(),
            password: "short".to_owned(),
        };

        let errors = body.validate().unwrap_err();
        let error = Error::from(errors);

        assert_eq!(error.kind(), ErrorKind::BadRequest);
        let message = error.message().unwrap_or_default().to_owned();
        assert!(message.contains("email") || message.contains("password"));
    }

    #[test]
    fn valid_body_passes() {
        let body = SignupBody {
            email: "user@example.com".to_owned(),
            password: "long-enough-secret".to_owned(),
        };
        assert!(body.validate().is_ok());
    }
}
