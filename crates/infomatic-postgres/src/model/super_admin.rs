//! Super-admin account model.
//!
//! Super-admins operate the dashboard itself: they manage editor accounts,
//! other super-admins, and hold unrestricted access to every admin-scoped
//! endpoint.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::super_admins;
use crate::types::AdminRole;

/// A super-admin account.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = super_admins)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SuperAdmin {
    /// Unique account identifier.
    pub id: Uuid,
    /// Login email, unique and stored lowercase.
    pub email_address: String,
    /// Argon2 password hash.
    pub password_hash: String,
    /// Administrative role.
    pub role: AdminRole,
    /// Whether the account may authenticate and act.
    pub is_active: bool,
    /// Timestamp when the account was created.
    pub created_at: Timestamp,
    /// Timestamp when the account was last updated.
    pub updated_at: Timestamp,
}

/// Data for creating a new super-admin.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = super_admins)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewSuperAdmin {
    /// Login email address.
    pub email_address: String,
    /// Argon2 password hash.
    pub password_hash: String,
    /// Administrative role.
    pub role: AdminRole,
}

/// Data for updating a super-admin.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = super_admins)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateSuperAdmin {
    /// Argon2 password hash.
    pub password_hash: Option<String>,
    /// Administrative role.
    pub role: Option<AdminRole>,
    /// Activation flag.
    pub is_active: Option<bool>,
}

impl UpdateSuperAdmin {
    /// Returns whether every field is unset.
    ///
    /// Diesel rejects an all-`None` changeset as a query-builder error, so
    /// callers skip the update entirely when there is nothing to change.
    pub fn is_empty(&self) -> bool {
        self.password_hash.is_none() && self.role.is_none() && self.is_active.is_none()
    }
}

impl SuperAdmin {
    /// Returns whether the account may authenticate.
    ///
    /// Deactivation takes effect on the next guarded request, not only at
    /// login, because guards re-fetch this row on every call.
    pub fn can_login(&self) -> bool {
        self.is_active
    }

    /// Returns whether the account may manage other super-admins.
    pub fn can_manage_admins(&self) -> bool {
        self.is_active && self.role.is_superuser()
    }
}
