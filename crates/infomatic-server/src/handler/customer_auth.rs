//! Customer authentication handlers for the `/clientapi` surface.
//!
//! Customers can sign in with email and password, sign up with the same
//! pair, or use a Google ID token. A Google sign-in for an unknown email
//! creates the account on the spot; for a known email it links the
//! account to Google while preserving any existing password.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum_extra::extract::CookieJar;
use infomatic_postgres::PgClient;
use infomatic_postgres::model::{Customer, NewCustomer, UpdateCustomer};
use infomatic_postgres::query::CustomerRepository;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::extract::{
    CustomerSession, Json, PrincipalKind, SessionClaims, SessionCookie, ValidateJson,
};
use crate::handler::{ErrorKind, Result};
use crate::service::{GoogleSignIn, PasswordHasher, ServiceState, SessionSettings, TokenKeys};

/// Tracing target for customer authentication.
const TRACING_TARGET: &str = "infomatic_server::handler::customer_auth";

/// Request payload for customer login.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct LoginRequest {
    /// Email address of the account.
    #[validate(email)]
    pub email_address: String,
    /// Password of the account.
    #[validate(length(min = 1))]
    pub password: String,
}

/// Request payload for customer signup.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct SignupRequest {
    /// Email address for the new account.
    #[validate(email)]
    pub email_address: String,
    /// Password for the new account.
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    /// Display name for the new account.
    #[validate(length(min = 1, max = 100))]
    pub display_name: String,
    /// Optional self-reported country.
    #[validate(length(max = 100))]
    pub country: Option<String>,
}

/// Request payload for Google sign-in.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct GoogleAuthRequest {
    /// Google ID token obtained by the frontend.
    #[validate(length(min = 1))]
    pub id_token: String,
}

/// Customer account data returned to its owner.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CustomerResponse {
    /// ID of the account.
    pub id: Uuid,
    /// Email address of the account.
    pub email_address: String,
    /// Display name.
    pub display_name: String,
    /// Avatar image URL, if any.
    pub avatar_url: Option<String>,
    /// Self-reported country, if any.
    pub country: Option<String>,
    /// Whether the account is linked to a Google identity.
    pub is_google_linked: bool,
    /// Whether the account carries a password credential.
    pub has_password: bool,
    /// Timestamp when the account was created.
    pub created_at: Timestamp,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        let has_password = customer.has_password();
        Self {
            id: customer.id,
            email_address: customer.email_address,
            display_name: customer.display_name,
            avatar_url: customer.avatar_url,
            country: customer.country,
            is_google_linked: customer.is_google_linked,
            has_password,
            created_at: customer.created_at.into(),
        }
    }
}

/// Response returned after a successful login or signup.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    /// The signed-in account.
    pub account: CustomerResponse,
    /// Timestamp when the session expires.
    pub expires_at: Timestamp,
}

/// Builds the session cookie and response body for a signed-in customer.
fn establish_session(
    customer: Customer,
    token_keys: &TokenKeys,
    session_settings: &SessionSettings,
) -> Result<(CookieJar, AuthResponse)> {
    let claims = SessionClaims::new(
        customer.id,
        PrincipalKind::Customer,
        token_keys.session_ttl_secs(),
    )
    .with_email(customer.email_address.clone());
    let token = claims.encode(token_keys)?;

    let jar = CookieJar::new().add(SessionCookie::bearer(token, session_settings));
    let response = AuthResponse {
        account: customer.into(),
        expires_at: claims.expires_at,
    };

    Ok((jar, response))
}

/// Authenticates a customer with email and password.
///
/// Accounts without a password credential (Google-only) fail exactly
/// like a wrong password, so the response does not reveal which
/// credential an email is registered with.
#[tracing::instrument(skip_all)]
async fn login(
    State(pg_client): State<PgClient>,
    State(password_hasher): State<PasswordHasher>,
    State(token_keys): State<TokenKeys>,
    State(session_settings): State<SessionSettings>,
    ValidateJson(request): ValidateJson<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    let mut conn = pg_client.get_connection().await?;
    let customer = conn.find_customer_by_email(&request.email_address).await?;

    let Some(customer) = customer else {
        password_hasher.verify_dummy_password(&request.password);
        tracing::debug!(
            target: TRACING_TARGET,
            "Customer login failed: unknown email address"
        );
        return Err(ErrorKind::Unauthorized
            .with_message("Authentication failed")
            .with_context("Invalid credentials")
            .into_static());
    };

    // A Google-only account fails the same way a wrong password does
    let Some(password_hash) = customer.password_hash.as_deref() else {
        password_hasher.verify_dummy_password(&request.password);
        tracing::debug!(
            target: TRACING_TARGET,
            account_id = %customer.id,
            "Customer login failed: account has no password credential"
        );
        return Err(ErrorKind::Unauthorized
            .with_message("Authentication failed")
            .with_context("Invalid credentials")
            .into_static());
    };

    password_hasher.verify_password(&request.password, password_hash)?;

    let customer = conn
        .touch_customer_login(customer.id)
        .await?
        .unwrap_or(customer);

    tracing::info!(
        target: TRACING_TARGET,
        account_id = %customer.id,
        "Customer signed in with password"
    );

    let (jar, response) = establish_session(customer, &token_keys, &session_settings)?;
    Ok((jar, Json(response)))
}

/// Registers a new customer account.
///
/// A duplicate email surfaces as a unique-index violation and maps to
/// `409 Conflict`; there is no prior existence check to race against.
#[tracing::instrument(skip_all)]
async fn signup(
    State(pg_client): State<PgClient>,
    State(password_hasher): State<PasswordHasher>,
    State(token_keys): State<TokenKeys>,
    State(session_settings): State<SessionSettings>,
    ValidateJson(request): ValidateJson<SignupRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>)> {
    let password_hash = password_hasher.hash_password(&request.password)?;

    let new_customer = NewCustomer {
        email_address: request.email_address,
        password_hash: Some(password_hash),
        display_name: request.display_name,
        avatar_url: None,
        country: request.country,
        is_google_linked: false,
    };

    let mut conn = pg_client.get_connection().await?;
    let customer = conn.create_customer(new_customer).await?;
    let customer = conn
        .touch_customer_login(customer.id)
        .await?
        .unwrap_or(customer);

    tracing::info!(
        target: TRACING_TARGET,
        account_id = %customer.id,
        "Customer account created"
    );

    let (jar, response) = establish_session(customer, &token_keys, &session_settings)?;
    Ok((StatusCode::CREATED, jar, Json(response)))
}

/// Signs a customer in with a Google ID token, creating the account on
/// first contact.
///
/// The verified email is the linking key: an existing account with the
/// same email is marked Google-linked and its profile refreshed, while
/// any password it carries is preserved.
#[tracing::instrument(skip_all)]
async fn google(
    State(pg_client): State<PgClient>,
    State(google_sign_in): State<GoogleSignIn>,
    State(token_keys): State<TokenKeys>,
    State(session_settings): State<SessionSettings>,
    ValidateJson(request): ValidateJson<GoogleAuthRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>)> {
    let identity = google_sign_in
        .verifier()?
        .verify(&request.id_token)
        .await?;

    let mut conn = pg_client.get_connection().await?;
    let existing = conn.find_customer_by_email(&identity.email_address).await?;

    let (customer, created) = match existing {
        Some(customer) => {
            let updates = UpdateCustomer {
                display_name: Some(identity.display_name),
                avatar_url: identity.avatar_url,
                is_google_linked: Some(true),
                ..Default::default()
            };

            let customer = conn
                .update_customer(customer.id, updates)
                .await?
                .unwrap_or(customer);
            (customer, false)
        }
        None => {
            let new_customer = NewCustomer {
                email_address: identity.email_address,
                password_hash: None,
                display_name: identity.display_name,
                avatar_url: identity.avatar_url,
                country: None,
                is_google_linked: true,
            };
            (conn.create_customer(new_customer).await?, true)
        }
    };

    let customer = conn
        .touch_customer_login(customer.id)
        .await?
        .unwrap_or(customer);

    tracing::info!(
        target: TRACING_TARGET,
        account_id = %customer.id,
        created,
        "Customer signed in with Google"
    );

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    let (jar, response) = establish_session(customer, &token_keys, &session_settings)?;
    Ok((status, jar, Json(response)))
}

/// Returns the account behind the current customer session.
#[tracing::instrument(skip_all)]
async fn verify(session: CustomerSession) -> Result<Json<CustomerResponse>> {
    Ok(Json(session.customer.into()))
}

/// Clears the session cookie.
#[tracing::instrument(skip_all)]
async fn logout(
    State(session_settings): State<SessionSettings>,
) -> Result<(StatusCode, CookieJar)> {
    let jar = CookieJar::new().add(SessionCookie::removal(&session_settings));
    Ok((StatusCode::OK, jar))
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/clientapi/auth", post(login).put(signup))
        .route("/clientapi/auth/google", post(google))
        .route("/clientapi/auth/verify", get(verify))
        .route("/clientapi/auth/logout", post(logout))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::routes;
    use crate::handler::test::create_test_server_with_router;

    #[tokio::test]
    async fn login_rejects_unknown_account() -> anyhow::Result<()> {
        let Some(server) = create_test_server_with_router(routes).await? else {
            return Ok(());
        };

        let response = server
            .post("/clientapi/auth")
            .json(&serde_json::json!({
                "emailAddress": "nobody@example.com",
                "password": "password123",
            }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn signup_rejects_short_password() -> anyhow::Result<()> {
        let Some(server) = create_test_server_with_router(routes).await? else {
            return Ok(());
        };

        let response = server
            .put("/clientapi/auth")
            .json(&serde_json::json!({
                "emailAddress": "user@example.com",
                "password": "short",
                "displayName": "User",
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn signup_then_login_round_trip() -> anyhow::Result<()> {
        let Some(server) = create_test_server_with_router(routes).await? else {
            return Ok(());
        };

        let email = format!("user-{}@example.com", uuid::Uuid::new_v4());
        let signup = server
            .put("/clientapi/auth")
            .json(&serde_json::json!({
                "emailAddress": email,
                "password": "long-enough-secret",
                "displayName": "Round Trip",
            }))
            .await;
        signup.assert_status(StatusCode::CREATED);

        let duplicate = server
            .put("/clientapi/auth")
            .json(&serde_json::json!({
                "emailAddress": email,
                "password": "long-enough-secret",
                "displayName": "Round Trip",
            }))
            .await;
        duplicate.assert_status(StatusCode::CONFLICT);

        let login = server
            .post("/clientapi/auth")
            .json(&serde_json::json!({
                "emailAddress": email,
                "password": "long-enough-secret",
            }))
            .await;
        login.assert_status(StatusCode::OK);
        let session_cookie = login.cookie("token");
        assert!(!session_cookie.value().is_empty());

        let verify = server
            .get("/clientapi/auth/verify")
            .add_cookie(session_cookie)
            .await;
        verify.assert_status(StatusCode::OK);
        Ok(())
    }

    #[tokio::test]
    async fn google_sign_in_is_not_found_when_disabled() -> anyhow::Result<()> {
        let Some(server) = create_test_server_with_router(routes).await? else {
            return Ok(());
        };

        let response = server
            .post("/clientapi/auth/google")
            .json(&serde_json::json!({ "idToken": "some-token" }))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        Ok(())
    }
}
