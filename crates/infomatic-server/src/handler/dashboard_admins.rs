//! Dashboard handlers for managing super-admin accounts.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use infomatic_postgres::PgClient;
use infomatic_postgres::model::NewSuperAdmin;
use infomatic_postgres::query::{Pagination, SuperAdminRepository};
use infomatic_postgres::types::AdminRole;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::extract::{AdminSession, Json, Path, Query, ValidateJson};
use crate::handler::{ErrorKind, Result};
use crate::service::{PasswordHasher, ServiceState};

/// Tracing target for super-admin management.
const TRACING_TARGET: &str = "infomatic_server::handler::dashboard_admins";

/// Request payload for creating a super-admin.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CreateAdminRequest {
    /// Login email address, unique.
    #[validate(email)]
    pub email_address: String,
    /// Initial password.
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    /// Administrative role. Defaults to the regular admin role.
    #[serde(default)]
    pub role: AdminRole,
}

/// Request payload for setting the activation flag.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct SetStatusRequest {
    /// Whether the account may authenticate and act.
    pub is_active: bool,
}

/// Request payload for resetting a password.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct ResetPasswordRequest {
    /// New password for the account.
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Pagination query parameters for listing.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    /// 1-based page number.
    pub page: Option<i64>,
    /// Items per page.
    pub per_page: Option<i64>,
}

impl ListQuery {
    fn pagination(&self) -> Pagination {
        Pagination::from_page(self.page.unwrap_or(1), self.per_page.unwrap_or(20))
    }
}

/// Super-admin account data returned to the dashboard.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdminAccountResponse {
    /// ID of the account.
    pub id: Uuid,
    /// Login email address.
    pub email_address: String,
    /// Administrative role.
    pub role: AdminRole,
    /// Whether the account is active.
    pub is_active: bool,
    /// Timestamp when the account was created.
    pub created_at: Timestamp,
}

impl From<infomatic_postgres::model::SuperAdmin> for AdminAccountResponse {
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

/// Lists super-admin accounts, most recent first.
#[tracing::instrument(skip_all)]
async fn list_admins(
    State(pg_client): State<PgClient>,
    _session: AdminSession,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<AdminAccountResponse>>> {
    let mut conn = pg_client.get_connection().await?;
    let admins = conn.list_super_admins(query.pagination()).await?;

    Ok(Json(admins.into_iter().map(Into::into).collect()))
}

/// Creates a new super-admin account.
#[tracing::instrument(skip_all)]
async fn create_admin(
    State(pg_client): State<PgClient>,
    State(password_hasher): State<PasswordHasher>,
    session: AdminSession,
    ValidateJson(request): ValidateJson<CreateAdminRequest>,
) -> Result<(StatusCode, Json<AdminAccountResponse>)> {
    let password_hash = password_hasher.hash_password(&request.password)?;

    let new_admin = NewSuperAdmin {
        email_address: request.email_address,
        password_hash,
        role: request.role,
    };

    let mut conn = pg_client.get_connection().await?;
    let admin = conn.create_super_admin(new_admin).await?;

    tracing::info!(
        target: TRACING_TARGET,
        admin_id = %admin.id,
        role = %admin.role,
        created_by = %session.admin.id,
        "Super-admin account created"
    );

    Ok((StatusCode::CREATED, Json(admin.into())))
}

/// Sets the activation flag of a super-admin account.
///
/// An admin cannot deactivate their own account; locking every admin
/// out of the dashboard should at least require a second person.
#[tracing::instrument(skip_all)]
async fn set_status(
    State(pg_client): State<PgClient>,
    session: AdminSession,
    Path(admin_id): Path<Uuid>,
    ValidateJson(request): ValidateJson<SetStatusRequest>,
) -> Result<Json<AdminAccountResponse>> {
    if admin_id == session.admin.id && !request.is_active {
        return Err(ErrorKind::Forbidden
            .with_message("You cannot deactivate your own account")
            .into_static());
    }

    let mut conn = pg_client.get_connection().await?;
    let admin = conn
        .set_super_admin_active(admin_id, request.is_active)
        .await?
        .ok_or_else(|| {
            ErrorKind::NotFound
                .with_message("Super-admin not found")
                .with_resource("super_admin")
                .into_static()
        })?;

    tracing::info!(
        target: TRACING_TARGET,
        admin_id = %admin.id,
        is_active = admin.is_active,
        changed_by = %session.admin.id,
        "Super-admin activation flag changed"
    );

    Ok(Json(admin.into()))
}

/// Resets the password of a super-admin account.
#[tracing::instrument(skip_all)]
async fn reset_password(
    State(pg_client): State<PgClient>,
    State(password_hasher): State<PasswordHasher>,
    session: AdminSession,
    Path(admin_id): Path<Uuid>,
    ValidateJson(request): ValidateJson<ResetPasswordRequest>,
) -> Result<Json<AdminAccountResponse>> {
    let password_hash = password_hasher.hash_password(&request.password)?;

    let mut conn = pg_client.get_connection().await?;
    let admin = conn
        .update_super_admin_password(admin_id, password_hash)
        .await?
        .ok_or_else(|| {
            ErrorKind::NotFound
                .with_message("Super-admin not found")
                .with_resource("super_admin")
                .into_static()
        })?;

    tracing::info!(
        target: TRACING_TARGET,
        admin_id = %admin.id,
        changed_by = %session.admin.id,
        "Super-admin password reset"
    );

    Ok(Json(admin.into()))
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/dashboard/super-user/list", get(list_admins))
        .route("/dashboard/super-user/create", post(create_admin))
        .route("/dashboard/super-user/status/{id}", post(set_status))
        .route("/dashboard/super-user/password/{id}", post(reset_password))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::routes;
    use crate::handler::test::create_test_server_with_router;

    #[tokio::test]
    async fn admin_management_requires_session() -> anyhow::Result<()> {
        let Some(server) = create_test_server_with_router(routes).await? else {
            return Ok(());
        };

        let response = server.get("/dashboard/super-user/list").await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        let response = server
            .post("/dashboard/super-user/create")
            .json(&serde_json::json!({
                "emailAddress": "admin@example.com",
                "password": "long-enough-secret",
            }))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        Ok(())
    }
}
