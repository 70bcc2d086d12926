//! Catalog content handlers for the `/userapi` surface.
//!
//! Every operation is scoped twice: the session must belong to an
//! active editor, and the editor's stored grants must include the
//! section named in the path.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use infomatic_postgres::PgClient;
use infomatic_postgres::model::{ContentItem, NewContentItem};
use infomatic_postgres::query::{ContentFilter, ContentRepository, Pagination};
use infomatic_postgres::types::ContentRoute;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::extract::{EditorSession, Json, Path, Query, ValidateJson};
use crate::handler::Result;
use crate::service::ServiceState;

/// Tracing target for catalog operations.
const TRACING_TARGET: &str = "infomatic_server::handler::catalog";

/// Query parameters for listing catalog items.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    /// 1-based page number.
    pub page: Option<i64>,
    /// Items per page.
    pub per_page: Option<i64>,
    /// Visibility filter; absent lists both active and inactive.
    pub is_active: Option<bool>,
}

/// Request payload for creating a catalog item.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CreateItemRequest {
    /// Item title.
    #[validate(length(min = 1, max = 200))]
    pub title: String,
}

/// Catalog item data returned to editors.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemResponse {
    /// ID of the item.
    pub id: Uuid,
    /// Content section the item belongs to.
    pub route: ContentRoute,
    /// Item title.
    pub title: String,
    /// Whether the item is publicly visible.
    pub is_active: bool,
    /// Timestamp when the item was created.
    pub created_at: Timestamp,
}

impl From<ContentItem> for ItemResponse {
    fn from(item: ContentItem) -> Self {
        Self {
            id: item.id,
            route: item.route,
            title: item.title,
            is_active: item.is_active,
            created_at: item.created_at.into(),
        }
    }
}

/// Response for a catalog listing.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    /// Items on this page, most recent first.
    pub items: Vec<ItemResponse>,
    /// Total number of items matching the filter.
    pub total: i64,
    /// 1-based page number of this page.
    pub page: i64,
}

/// Lists the editor's own items in one content section.
///
/// Editors only ever see their own items, even on sections they share
/// with other editors.
#[tracing::instrument(skip_all, fields(route = %route))]
async fn list_items(
    State(pg_client): State<PgClient>,
    session: EditorSession,
    Path(route): Path<ContentRoute>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>> {
    session.authorize(route)?;

    let pagination = Pagination::from_page(query.page.unwrap_or(1), query.per_page.unwrap_or(20));
    let filter = ContentFilter {
        route,
        author_id: session.editor.id,
        is_active: query.is_active,
    };

    let mut conn = pg_client.get_connection().await?;
    let items = conn.list_content_items(filter, pagination).await?;
    let total = conn.count_content_items(filter).await?;

    let response = ListResponse {
        items: items.into_iter().map(Into::into).collect(),
        total,
        page: pagination.page_number(),
    };

    Ok(Json(response))
}

/// Creates a catalog item in one content section.
#[tracing::instrument(skip_all, fields(route = %route))]
async fn create_item(
    State(pg_client): State<PgClient>,
    session: EditorSession,
    Path(route): Path<ContentRoute>,
    ValidateJson(request): ValidateJson<CreateItemRequest>,
) -> Result<(StatusCode, Json<ItemResponse>)> {
    session.authorize(route)?;

    let new_item = NewContentItem {
        route,
        title: request.title,
        author_id: session.editor.id,
    };

    let mut conn = pg_client.get_connection().await?;
    let item = conn.create_content_item(new_item).await?;

    tracing::info!(
        target: TRACING_TARGET,
        item_id = %item.id,
        route = %item.route,
        author_id = %session.editor.id,
        "Catalog item created"
    );

    Ok((StatusCode::CREATED, Json(item.into())))
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/userapi/{route}/list", get(list_items))
        .route("/userapi/{route}/create", post(create_item))
}

#[cfg(test)]
mod tests {
    use axum::extract::FromRef;
    use axum::http::StatusCode;
    use infomatic_postgres::PgClient;
    use infomatic_postgres::model::NewEditor;
    use infomatic_postgres::query::EditorRepository;
    use infomatic_postgres::types::ContentRoute;
    use uuid::Uuid;

    use super::routes;
    use crate::handler::test::{create_test_server_with_router, create_test_server_with_state};
    use crate::service::PasswordHasher;

    #[tokio::test]
    async fn listing_requires_session() -> anyhow::Result<()> {
        let Some(server) = create_test_server_with_router(routes).await? else {
            return Ok(());
        };

        let response = server.get("/userapi/news/list").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn creating_requires_session() -> anyhow::Result<()> {
        let Some(server) = create_test_server_with_router(routes).await? else {
            return Ok(());
        };

        let response = server
            .post("/userapi/gadget/create")
            .json(&serde_json::json!({ "title": "New gadget review" }))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn listing_is_denied_outside_granted_routes() -> anyhow::Result<()> {
        let Some((server, state)) = create_test_server_with_state().await? else {
            return Ok(());
        };

        let pg_client = PgClient::from_ref(&state);
        let password_hasher = PasswordHasher::from_ref(&state);

        let username = format!("newsdesk-{}", Uuid::new_v4().simple());
        let new_editor = NewEditor {
            username: username.clone(),
            full_name: "News Desk".to_owned(),
            email_address: format!("{username}@example.com"),
            password_hash: password_hasher.hash_password("long-enough-secret")?,
            routes: vec![ContentRoute::News],
        };

        let mut conn = pg_client.get_connection().await?;
        let editor = conn.create_editor(new_editor).await?;
        drop(conn);

        let login = server
            .post("/userapi/auth/login")
            .json(&serde_json::json!({
                "username": username,
                "password": "long-enough-secret",
            }))
            .await;
        login.assert_status_ok();
        let session_cookie = login.cookie("token");

        let granted = server
            .get("/userapi/news/list")
            .add_cookie(session_cookie.clone())
            .await;
        granted.assert_status_ok();

        let denied = server
            .get("/userapi/articles/list")
            .add_cookie(session_cookie)
            .await;
        denied.assert_status(StatusCode::FORBIDDEN);

        let mut conn = pg_client.get_connection().await?;
        conn.delete_editor(editor.id).await?;
        Ok(())
    }
}
