//! Editor account model.
//!
//! Editors author catalog content and carry a per-account list of content
//! routes they are allowed to operate on. The list is stored as a Postgres
//! enum array and is guaranteed non-empty by a check constraint.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::editors;
use crate::types::ContentRoute;

/// An editor account with per-route permissions.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = editors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Editor {
    /// Unique account identifier.
    pub id: Uuid,
    /// Login username, unique.
    pub username: String,
    /// Human-readable display name.
    pub full_name: String,
    /// Contact email, unique and stored lowercase.
    pub email_address: String,
    /// Argon2 password hash.
    pub password_hash: String,
    /// Whether the account may authenticate and act.
    pub is_active: bool,
    /// Content sections this editor may operate on. Never empty.
    pub routes: Vec<ContentRoute>,
    /// Timestamp when the account was created.
    pub created_at: Timestamp,
    /// Timestamp when the account was last updated.
    pub updated_at: Timestamp,
}

/// Data for creating a new editor.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = editors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewEditor {
    /// Login username.
    pub username: String,
    /// Human-readable display name.
    pub full_name: String,
    /// Contact email address.
    pub email_address: String,
    /// Argon2 password hash.
    pub password_hash: String,
    /// Content sections this editor may operate on.
    pub routes: Vec<ContentRoute>,
}

/// Data for updating an editor.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = editors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateEditor {
    /// Login username.
    pub username: Option<String>,
    /// Human-readable display name.
    pub full_name: Option<String>,
    /// Contact email address.
    pub email_address: Option<String>,
    /// Argon2 password hash.
    pub password_hash: Option<String>,
    /// Activation flag.
    pub is_active: Option<bool>,
    /// Content sections this editor may operate on.
    pub routes: Option<Vec<ContentRoute>>,
}

impl UpdateEditor {
    /// Returns whether every field is unset.
    ///
    /// Diesel rejects an all-`None` changeset as a query-builder error, so
    /// callers skip the update entirely when there is nothing to change.
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.full_name.is_none()
            && self.email_address.is_none()
            && self.password_hash.is_none()
            && self.is_active.is_none()
            && self.routes.is_none()
    }
}

impl Editor {
    /// Returns whether the account may authenticate.
    pub fn can_login(&self) -> bool {
        self.is_active
    }

    /// Returns whether this editor is permitted to operate on `route`.
    ///
    /// Possession of a valid token is not enough for catalog endpoints; the
    /// route must also appear in the editor's stored permission list.
    pub fn is_authorized(&self, route: ContentRoute) -> bool {
        self.routes.contains(&route)
    }
}

#[cfg(test)]
mod tests {
    use jiff_diesel::Timestamp;

    use super::*;

    fn editor_with(routes: Vec<ContentRoute>, is_active: bool) -> Editor {
        let now = Timestamp::from(jiff::Timestamp::now());
        Editor {
            id: Uuid::new_v4(),
            username: "newsdesk".to_owned(),
            full_name: "News Desk".to_owned(),
            email_address: "newsdesk@example.com".to_owned(),
            password_hash: "$argon2id$placeholder".to_owned(),
            is_active,
            routes,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn authorization_follows_granted_routes() {
        let editor = editor_with(vec![ContentRoute::News], true);

        assert!(editor.is_authorized(ContentRoute::News));
        assert!(!editor.is_authorized(ContentRoute::Articles));
        assert!(!editor.is_authorized(ContentRoute::Gadget));
        assert!(!editor.is_authorized(ContentRoute::Mobiles));
    }

    #[test]
    fn deactivated_editor_cannot_login() {
        let editor = editor_with(vec![ContentRoute::News], false);
        assert!(!editor.can_login());

        let editor = editor_with(vec![ContentRoute::News], true);
        assert!(editor.can_login());
    }

    #[test]
    fn empty_changeset_is_detected() {
        assert!(UpdateEditor::default().is_empty());

        let updates = UpdateEditor {
            is_active: Some(false),
            ..Default::default()
        };
        assert!(!updates.is_empty());
    }
}
