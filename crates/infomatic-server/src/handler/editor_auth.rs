//! Editor authentication handlers for the `/userapi` surface.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum_extra::extract::CookieJar;
use infomatic_postgres::PgClient;
use infomatic_postgres::query::EditorRepository;
use infomatic_postgres::types::ContentRoute;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::extract::{
    EditorSession, Json, PrincipalKind, SessionClaims, SessionCookie, ValidateJson,
};
use crate::handler::{ErrorKind, Result};
use crate::service::{PasswordHasher, ServiceState, SessionSettings, TokenKeys};

/// Tracing target for editor authentication.
const TRACING_TARGET: &str = "infomatic_server::handler::editor_auth";

/// Request payload for editor login.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct LoginRequest {
    /// Login username of the account.
    #[validate(length(min = 1))]
    pub username: String,
    /// Password of the account.
    #[validate(length(min = 1))]
    pub password: String,
}

/// Editor account data returned to its owner.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EditorProfileResponse {
    /// ID of the account.
    pub id: Uuid,
    /// Login username.
    pub username: String,
    /// Display name.
    pub full_name: String,
    /// Contact email address.
    pub email_address: String,
    /// Content sections this editor may operate on.
    pub routes: Vec<ContentRoute>,
    /// Timestamp when the account was created.
    pub created_at: Timestamp,
}

impl From<infomatic_postgres::model::Editor> for EditorProfileResponse {
    fn from(editor: infomatic_postgres::model::Editor) -> Self {
        Self {
            id: editor.id,
            username: editor.username,
            full_name: editor.full_name,
            email_address: editor.email_address,
            routes: editor.routes,
            created_at: editor.created_at.into(),
        }
    }
}

/// Response returned after a successful login.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    /// The signed-in account.
    pub account: EditorProfileResponse,
    /// Timestamp when the session expires.
    pub expires_at: Timestamp,
}

/// Authenticates an editor by username and sets the session cookie.
#[tracing::instrument(skip_all)]
async fn login(
    State(pg_client): State<PgClient>,
    State(password_hasher): State<PasswordHasher>,
    State(token_keys): State<TokenKeys>,
    State(session_settings): State<SessionSettings>,
    ValidateJson(request): ValidateJson<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    let mut conn = pg_client.get_connection().await?;
    let editor = conn.find_editor_by_username(&request.username).await?;

    let Some(editor) = editor else {
        password_hasher.verify_dummy_password(&request.password);
        tracing::debug!(
            target: TRACING_TARGET,
            "Editor login failed: unknown username"
        );
        return Err(ErrorKind::Unauthorized
            .with_message("Authentication failed")
            .with_context("Invalid credentials")
            .into_static());
    };

    password_hasher.verify_password(&request.password, &editor.password_hash)?;

    if !editor.can_login() {
        tracing::warn!(
            target: TRACING_TARGET,
            account_id = %editor.id,
            "Editor login rejected: account is deactivated"
        );
        return Err(ErrorKind::Forbidden
            .with_message("Your account has been deactivated")
            .into_static());
    }

    let claims = SessionClaims::new(
        editor.id,
        PrincipalKind::Editor,
        token_keys.session_ttl_secs(),
    );
    let token = claims.encode(&token_keys)?;

    tracing::info!(
        target: TRACING_TARGET,
        account_id = %editor.id,
        username = %editor.username,
        "Editor signed in"
    );

    let jar = CookieJar::new().add(SessionCookie::bearer(token, &session_settings));
    let response = LoginResponse {
        account: editor.into(),
        expires_at: claims.expires_at,
    };

    Ok((jar, Json(response)))
}

/// Returns the account behind the current editor session.
#[tracing::instrument(skip_all)]
async fn verify(session: EditorSession) -> Result<Json<EditorProfileResponse>> {
    Ok(Json(session.editor.into()))
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
        .route("/userapi/auth/login", post(login))
        .route("/userapi/auth/verify", get(verify))
        .route("/userapi/auth/logout", post(logout))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::routes;
    use crate::handler::test::create_test_server_with_router;

    #[tokio::test]
    async fn login_rejects_unknown_username() -> anyhow::Result<()> {
        let Some(server) = create_test_server_with_router(routes).await? else {
            return Ok(());
        };

        let response = server
            .post("/userapi/auth/login")
            .json(&serde_json::json!({
                "username": "no-such-editor",
                "password": "password123",
            }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn login_rejects_empty_credentials() -> anyhow::Result<()> {
        let Some(server) = create_test_server_with_router(routes).await? else {
            return Ok(());
        };

        let response = server
            .post("/userapi/auth/login")
            .json(&serde_json::json!({ "username": "", "password": "" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn verify_requires_token() -> anyhow::Result<()> {
        let Some(server) = create_test_server_with_router(routes).await? else {
            return Ok(());
        };

        let response = server.get("/userapi/auth/verify").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        Ok(())
    }
}
