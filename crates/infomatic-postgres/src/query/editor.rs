//! Editor repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use super::Pagination;
use crate::model::{Editor, NewEditor, UpdateEditor};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for editor account operations.
///
/// Username and email uniqueness is enforced by the store; duplicate values
/// surface as unique-index violations on insert or update.
pub trait EditorRepository {
    /// Creates a new editor account.
    fn create_editor(
        &mut self,
        new_editor: NewEditor,
    ) -> impl Future<Output = PgResult<Editor>> + Send;

    /// Finds an editor by its unique identifier.
    fn find_editor_by_id(
        &mut self,
        editor_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Editor>>> + Send;

    /// Finds an editor by login username. The comparison is exact.
    fn find_editor_by_username(
        &mut self,
        username: &str,
    ) -> impl Future<Output = PgResult<Option<Editor>>> + Send;

    /// Applies partial updates to an editor. Returns `None` if the account
    /// was not found.
    fn update_editor(
        &mut self,
        editor_id: Uuid,
        updates: UpdateEditor,
    ) -> impl Future<Output = PgResult<Option<Editor>>> + Send;

    /// Sets the activation flag of an editor. Returns `None` if the account
    /// was not found.
    fn set_editor_active(
        &mut self,
        editor_id: Uuid,
        is_active: bool,
    ) -> impl Future<Output = PgResult<Option<Editor>>> + Send;

    /// Permanently deletes an editor account.
    ///
    /// Returns the deleted row, or `None` if the account was not found.
    fn delete_editor(
        &mut self,
        editor_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Editor>>> + Send;

    /// Lists editors ordered by creation time, most recent first.
    fn list_editors(
        &mut self,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<Editor>>> + Send;
}

impl EditorRepository for PgConnection {
    async fn create_editor(&mut self, mut new_editor: NewEditor) -> PgResult<Editor> {
        use schema::editors;

        new_editor.username = new_editor.username.trim().to_owned();
        new_editor.full_name = new_editor.full_name.trim().to_owned();
        new_editor.email_address = new_editor.email_address.trim().to_lowercase();

        diesel::insert_into(editors::table)
            .values(&new_editor)
            .returning(Editor::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_editor_by_id(&mut self, editor_id: Uuid) -> PgResult<Option<Editor>> {
        use schema::editors::{self, dsl};

        editors::table
            .filter(dsl::id.eq(editor_id))
            .select(Editor::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_editor_by_username(&mut self, username: &str) -> PgResult<Option<Editor>> {
        use schema::editors::{self, dsl};

        editors::table
            .filter(dsl::username.eq(username.trim()))
            .select(Editor::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn update_editor(
        &mut self,
        editor_id: Uuid,
        mut updates: UpdateEditor,
    ) -> PgResult<Option<Editor>> {
        use schema::editors::{self, dsl};

        // An all-`None` changeset would fail inside diesel's query builder.
        if updates.is_empty() {
            return self.find_editor_by_id(editor_id).await;
        }

        if let Some(username) = updates.username.as_mut() {
            *username = username.trim().to_owned();
        }
        if let Some(full_name) = updates.full_name.as_mut() {
            *full_name = full_name.trim().to_owned();
        }
        if let Some(email) = updates.email_address.as_mut() {
            *email = email.trim().to_lowercase();
        }

        diesel::update(editors::table.filter(dsl::id.eq(editor_id)))
            .set(&updates)
            .returning(Editor::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn set_editor_active(
        &mut self,
        editor_id: Uuid,
        is_active: bool,
    ) -> PgResult<Option<Editor>> {
        self.update_editor(
            editor_id,
            UpdateEditor {
                is_active: Some(is_active),
                ..Default::default()
            },
        )
        .await
    }

    async fn delete_editor(&mut self, editor_id: Uuid) -> PgResult<Option<Editor>> {
        use schema::editors::{self, dsl};

        diesel::delete(editors::table.filter(dsl::id.eq(editor_id)))
            .returning(Editor::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn list_editors(&mut self, pagination: Pagination) -> PgResult<Vec<Editor>> {
        use schema::editors::{self, dsl};

        editors::table
            .order(dsl::created_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(Editor::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }
}
