//! Customer profile handlers for the `/clientapi` surface.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{post, put};
use infomatic_postgres::PgClient;
use infomatic_postgres::model::UpdateCustomer;
use infomatic_postgres::query::CustomerRepository;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::extract::{CustomerSession, Json, ValidateJson};
use crate::handler::customer_auth::CustomerResponse;
use crate::handler::{ErrorKind, Result};
use crate::service::{PasswordHasher, ServiceState};

/// Tracing target for customer profile operations.
const TRACING_TARGET: &str = "infomatic_server::handler::customer_profile";

/// Request payload for updating the customer profile.
///
/// Only the provided fields change; absent fields keep their value.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct UpdateProfileRequest {
    /// New display name.
    #[validate(length(min = 1, max = 100))]
    pub display_name: Option<String>,
    /// New avatar image URL.
    #[validate(url)]
    pub avatar_url: Option<String>,
    /// New self-reported country.
    #[validate(length(max = 100))]
    pub country: Option<String>,
}

/// Request payload for creating a first password.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CreatePasswordRequest {
    /// Password to set on the account.
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Updates the signed-in customer's profile.
///
/// The target account always comes from the session, never from the
/// request body.
#[tracing::instrument(skip_all)]
async fn update_profile(
    State(pg_client): State<PgClient>,
    session: CustomerSession,
    ValidateJson(request): ValidateJson<UpdateProfileRequest>,
) -> Result<Json<CustomerResponse>> {
    let updates = UpdateCustomer {
        display_name: request.display_name,
        avatar_url: request.avatar_url,
        country: request.country,
        ..Default::default()
    };

    let mut conn = pg_client.get_connection().await?;
    let customer = conn
        .update_customer(session.customer.id, updates)
        .await?
        .ok_or_else(|| {
            ErrorKind::NotFound
                .with_message("Account not found")
                .with_resource("customer")
                .into_static()
        })?;

    tracing::info!(
        target: TRACING_TARGET,
        account_id = %customer.id,
        "Customer profile updated"
    );

    Ok(Json(customer.into()))
}

/// Creates a password for a Google-only account.
///
/// Only accounts that signed up through Google and never set a password
/// qualify; changing an existing password is a separate, verified flow
/// and is rejected here with `403`.
#[tracing::instrument(skip_all)]
async fn create_password(
    State(pg_client): State<PgClient>,
    State(password_hasher): State<PasswordHasher>,
    session: CustomerSession,
    ValidateJson(request): ValidateJson<CreatePasswordRequest>,
) -> Result<Json<CustomerResponse>> {
    if !session.customer.can_create_password() {
        tracing::warn!(
            target: TRACING_TARGET,
            account_id = %session.customer.id,
            has_password = session.customer.has_password(),
            "Password creation rejected: account does not qualify"
        );
        return Err(ErrorKind::Forbidden
            .with_message("A password cannot be created for this account")
            .with_context("Only Google-linked accounts without a password qualify")
            .into_static());
    }

    let password_hash = password_hasher.hash_password(&request.password)?;

    let mut conn = pg_client.get_connection().await?;
    let customer = conn
        .update_customer_password(session.customer.id, password_hash)
        .await?
        .ok_or_else(|| {
            ErrorKind::NotFound
                .with_message("Account not found")
                .with_resource("customer")
                .into_static()
        })?;

    tracing::info!(
        target: TRACING_TARGET,
        account_id = %customer.id,
        "Customer created a password credential"
    );

    Ok(Json(customer.into()))
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/clientapi/profile", post(update_profile))
        .route("/clientapi/profile/password", put(create_password))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::routes;
    use crate::handler::test::{create_test_server, create_test_server_with_router};

    #[tokio::test]
    async fn profile_update_requires_session() -> anyhow::Result<()> {
        let Some(server) = create_test_server_with_router(routes).await? else {
            return Ok(());
        };

        let response = server
            .post("/clientapi/profile")
            .json(&serde_json::json!({ "displayName": "New Name" }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn password_creation_requires_session() -> anyhow::Result<()> {
        let Some(server) = create_test_server_with_router(routes).await? else {
            return Ok(());
        };

        let response = server
            .put("/clientapi/profile/password")
            .json(&serde_json::json!({ "password": "long-enough-secret" }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn update_with_no_fields_returns_unchanged_profile() -> anyhow::Result<()> {
        let Some(server) = create_test_server().await? else {
            return Ok(());
        };

        let email = format!("user-{}@example.com", uuid::Uuid::new_v4());
        let signup = server
            .put("/clientapi/auth")
            .json(&serde_json::json!({
                "emailAddress": email,
                "password": "long-enough-secret",
                "displayName": "No Changes",
            }))
            .await;
        signup.assert_status(StatusCode::CREATED);
        let session_cookie = signup.cookie("token");

        let response = server
            .post("/clientapi/profile")
            .add_cookie(session_cookie)
            .json(&serde_json::json!({}))
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["displayName"], "No Changes");
        Ok(())
    }
}
