//! Super-admin authentication handlers for the dashboard.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum_extra::extract::CookieJar;
use infomatic_postgres::PgClient;
use infomatic_postgres::query::SuperAdminRepository;
use infomatic_postgres::types::AdminRole;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::extract::{AdminSession, Json, PrincipalKind, SessionClaims, SessionCookie, ValidateJson};
use crate::handler::{ErrorKind, Result};
use crate::service::{PasswordHasher, ServiceState, SessionSettings, TokenKeys};

/// Tracing target for super-admin authentication.
const TRACING_TARGET: &str = "infomatic_server::handler::admin_auth";

/// Request payload for super-admin login.
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

/// Super-admin account data returned to the dashboard.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdminResponse {
    /// ID of the account.
    pub id: Uuid,
    /// Email address of the account.
    pub email_address: String,
    /// Administrative role.
    pub role: AdminRole,
    /// Whether the account is active.
    pub is_active: bool,
    /// Timestamp when the account was created.
    pub created_at: Timestamp,
}

impl From<infomatic_postgres::model::SuperAdmin> for AdminResponse {
    fn from(admin: infomatic_postgres::model::SuperAdmin) -> Self {
        Self {
            id: admin.id,
            email_address: admin.email_address,
            role: admin.role,
            is_active: admin.is_active,
            created_at: admin.created_at.into(),
        }
    }
}

/// Response returned after a successful login.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    /// The signed-in account.
    pub account: AdminResponse,
    /// Timestamp when the session expires.
    pub expires_at: Timestamp,
}

/// Authenticates a super-admin and sets the session cookie.
///
/// Login failures for unknown and deactivated accounts take the same
/// code path as wrong passwords where possible, so response timing does
/// not reveal whether an email is registered.
#[tracing::instrument(skip_all)]
async fn login(
    State(pg_client): State<PgClient>,
    State(password_hasher): State<PasswordHasher>,
    State(token_keys): State<TokenKeys>,
    State(session_settings): State<SessionSettings>,
    ValidateJson(request): ValidateJson<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    let mut conn = pg_client.get_connection().await?;
    let admin = conn.find_super_admin_by_email(&request.email_address).await?;

    let Some(admin) = admin else {
        password_hasher.verify_dummy_password(&request.password);
        tracing::debug!(
            target: TRACING_TARGET,
            "Admin login failed: unknown email address"
        );
        return Err(ErrorKind::Unauthorized
            .with_message("Authentication failed")
            .with_context("Invalid credentials")
            .into_static());
    };

    password_hasher.verify_password(&request.password, &admin.password_hash)?;

    if !admin.can_login() {
        tracing::warn!(
            target: TRACING_TARGET,
            account_id = %admin.id,
            "Admin login rejected: account is deactivated"
        );
        return Err(ErrorKind::Forbidden
            .with_message("Your account has been deactivated")
            .into_static());
    }

    let claims = SessionClaims::new(
        admin.id,
        PrincipalKind::Admin,
        token_keys.session_ttl_secs(),
    )
    .with_email(admin.email_address.clone());
    let token = claims.encode(&token_keys)?;

    tracing::info!(
        target: TRACING_TARGET,
        account_id = %admin.id,
        "Admin signed in"
    );

    let jar = CookieJar::new().add(SessionCookie::bearer(token, &session_settings));
    let response = LoginResponse {
        account: admin.into(),
        expires_at: claims.expires_at,
    };

    Ok((jar, Json(response)))
}

/// Returns the account behind the current admin session.
#[tracing::instrument(skip_all)]
async fn verify(session: AdminSession) -> Result<Json<AdminResponse>> {
    Ok(Json(session.admin.into()))
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
        .route("/auth/login", post(login))
        .route("/auth/verify", get(verify))
        .route("/auth/logout", post(logout))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::routes;
    use crate::handler::test::create_test_server_with_router;

    #[tokio::test]
    async fn login_rejects_invalid_email() -> anyhow::Result<()> {
        let Some(server) = create_test_server_with_router(routes).await? else {
            return Ok(());
        };

        let response = server
            .post("/auth/login")
            .json(&serde_json::json!({
                "emailAddress": "not-an-email",
                "password": "password123",
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn login_rejects_unknown_account() -> anyhow::Result<()> {
        let Some(server) = create_test_server_with_router(routes).await? else {
            return Ok(());
        };

        let response = server
            .post("/auth/login")
            .json(&serde_json::json!({
                "emailAddress": "nobody@example.com",
                "password": "password123",
            }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn verify_requires_token() -> anyhow::Result<()> {
        let Some(server) = create_test_server_with_router(routes).await? else {
            return Ok(());
        };

        let response = server.get("/auth/verify").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn logout_clears_cookie() -> anyhow::Result<()> {
        let Some(server) = create_test_server_with_router(routes).await? else {
            return Ok(());
        };

        let response = server.post("/auth/logout").await;
        response.assert_status(StatusCode::OK);

        let cookie = response.cookie("token");
        assert_eq!(cookie.value(), "");
        Ok(())
    }
}
