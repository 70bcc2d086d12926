//! Dashboard handlers for managing editor accounts.
//!
//! All operations require a super-admin session. Duplicate usernames
//! and emails surface as unique-index violations and map to `409`.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use infomatic_postgres::PgClient;
use infomatic_postgres::model::{Editor, NewEditor, UpdateEditor};
use infomatic_postgres::query::{EditorRepository, Pagination};
use infomatic_postgres::types::ContentRoute;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::extract::{AdminSession, Json, Path, Query, ValidateJson};
use crate::handler::{ErrorKind, Result};
use crate::service::{PasswordHasher, ServiceState};

/// Tracing target for editor management.
const TRACING_TARGET: &str = "infomatic_server::handler::dashboard_editors";

/// Request payload for creating an editor.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CreateEditorRequest {
    /// Login username, unique.
    #[validate(length(min = 3, max = 32))]
    pub username: String,
    /// Human-readable display name.
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,
    /// Contact email address, unique.
    #[validate(email)]
    pub email_address: String,
    /// Initial password.
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    /// Content sections this editor may operate on.
    #[validate(length(min = 1))]
    pub routes: Vec<ContentRoute>,
}

/// Request payload for updating an editor.
///
/// Only the provided fields change; absent fields keep their value.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct UpdateEditorRequest {
    /// New login username.
    #[validate(length(min = 3, max = 32))]
    pub username: Option<String>,
    /// New display name.
    #[validate(length(min = 1, max = 100))]
    pub full_name: Option<String>,
    /// New contact email address.
    #[validate(email)]
    pub email_address: Option<String>,
    /// New password.
    #[validate(length(min = 8, max = 128))]
    pub password: Option<String>,
    /// New activation flag.
    pub is_active: Option<bool>,
    /// New set of granted content sections. Must not be empty.
    #[validate(length(min = 1))]
    pub routes: Option<Vec<ContentRoute>>,
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

/// Editor account data returned to the dashboard.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EditorResponse {
    /// ID of the account.
    pub id: Uuid,
    /// Login username.
    pub username: String,
    /// Display name.
    pub full_name: String,
    /// Contact email address.
    pub email_address: String,
    /// Whether the account is active.
    pub is_active: bool,
    /// Content sections this editor may operate on.
    pub routes: Vec<ContentRoute>,
    /// Timestamp when the account was created.
    pub created_at: Timestamp,
}

impl From<Editor> for EditorResponse {
    fn from(editor: Editor) -> Self {
        Self {
            id: editor.id,
            username: editor.username,
            full_name: editor.full_name,
            email_address: editor.email_address,
            is_active: editor.is_active,
            routes: editor.routes,
            created_at: editor.created_at.into(),
        }
    }
}

/// Creates a new editor account.
#[tracing::instrument(skip_all)]
async fn create_editor(
    State(pg_client): State<PgClient>,
    State(password_hasher): State<PasswordHasher>,
    session: AdminSession,
    ValidateJson(request): ValidateJson<CreateEditorRequest>,
) -> Result<(StatusCode, Json<EditorResponse>)> {
    let password_hash = password_hasher.hash_password(&request.password)?;

    let new_editor = NewEditor {
        username: request.username,
        full_name: request.full_name,
        email_address: request.email_address,
        password_hash,
        routes: request.routes,
    };

    let mut conn = pg_client.get_connection().await?;
    let editor = conn.create_editor(new_editor).await?;

    tracing::info!(
        target: TRACING_TARGET,
        editor_id = %editor.id,
        username = %editor.username,
        created_by = %session.admin.id,
        "Editor account created"
    );

    Ok((StatusCode::CREATED, Json(editor.into())))
}

/// Lists editor accounts, most recent first.
#[tracing::instrument(skip_all)]
async fn list_editors(
    State(pg_client): State<PgClient>,
    _session: AdminSession,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<EditorResponse>>> {
    let mut conn = pg_client.get_connection().await?;
    let editors = conn.list_editors(query.pagination()).await?;

    Ok(Json(editors.into_iter().map(Into::into).collect()))
}

/// Applies partial updates to an editor account.
#[tracing::instrument(skip_all)]
async fn update_editor(
    State(pg_client): State<PgClient>,
    State(password_hasher): State<PasswordHasher>,
    session: AdminSession,
    Path(editor_id): Path<Uuid>,
    ValidateJson(request): ValidateJson<UpdateEditorRequest>,
) -> Result<Json<EditorResponse>> {
    let password_hash = request
        .password
        .as_deref()
        .map(|password| password_hasher.hash_password(password))
        .transpose()?;

    let updates = UpdateEditor {
        username: request.username,
        full_name: request.full_name,
        email_address: request.email_address,
        password_hash,
        is_active: request.is_active,
        routes: request.routes,
    };

    let mut conn = pg_client.get_connection().await?;
    let editor = conn
        .update_editor(editor_id, updates)
        .await?
        .ok_or_else(|| {
            ErrorKind::NotFound
                .with_message("Editor not found")
                .with_resource("editor")
                .into_static()
        })?;

    tracing::info!(
        target: TRACING_TARGET,
        editor_id = %editor.id,
        updated_by = %session.admin.id,
        "Editor account updated"
    );

    Ok(Json(editor.into()))
}

/// Permanently deletes an editor account.
#[tracing::instrument(skip_all)]
async fn delete_editor(
    State(pg_client): State<PgClient>,
    session: AdminSession,
    Path(editor_id): Path<Uuid>,
) -> Result<Json<EditorResponse>> {
    let mut conn = pg_client.get_connection().await?;
    let editor = conn.delete_editor(editor_id).await?.ok_or_else(|| {
        ErrorKind::NotFound
            .with_message("Editor not found")
            .with_resource("editor")
            .into_static()
    })?;

    tracing::info!(
        target: TRACING_TARGET,
        editor_id = %editor.id,
        deleted_by = %session.admin.id,
        "Editor account deleted"
    );

    Ok(Json(editor.into()))
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/dashboard/users/create", post(create_editor))
        .route("/dashboard/users/list", get(list_editors))
        .route("/dashboard/users/update/{id}", put(update_editor))
        .route("/dashboard/users/delete/{id}", delete(delete_editor))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::routes;
    use crate::handler::test::create_test_server_with_router;

    #[tokio::test]
    async fn editor_management_requires_session() -> anyhow::Result<()> {
        let Some(server) = create_test_server_with_router(routes).await? else {
            return Ok(());
        };

        let response = server.get("/dashboard/users/list").await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        let response = server
            .post("/dashboard/users/create")
            .json(&serde_json::json!({
                "username": "editor1",
                "fullName": "Editor One",
                "emailAddress": "editor1@example.com",
                "password": "long-enough-secret",
                "routes": ["news"],
            }))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        Ok(())
    }
}
