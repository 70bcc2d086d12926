//! Super-admin repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use super::Pagination;
use crate::model::{NewSuperAdmin, SuperAdmin, UpdateSuperAdmin};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for super-admin account operations.
///
/// Duplicate emails surface as unique-index violations on insert, never as a
/// prior existence check; callers map those through
/// [`PgError::constraint_violation`].
pub trait SuperAdminRepository {
    /// Creates a new super-admin account.
    fn create_super_admin(
        &mut self,
        new_admin: NewSuperAdmin,
    ) -> impl Future<Output = PgResult<SuperAdmin>> + Send;

    /// Finds a super-admin by its unique identifier.
    fn find_super_admin_by_id(
        &mut self,
        admin_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<SuperAdmin>>> + Send;

    /// Finds a super-admin by email address.
    ///
    /// Email comparison is case-insensitive; the stored value is lowercase.
    fn find_super_admin_by_email(
        &mut self,
        email: &str,
    ) -> impl Future<Output = PgResult<Option<SuperAdmin>>> + Send;

    /// Applies partial updates to a super-admin. Returns `None` if the
    /// account was not found.
    fn update_super_admin(
        &mut self,
        admin_id: Uuid,
        updates: UpdateSuperAdmin,
    ) -> impl Future<Output = PgResult<Option<SuperAdmin>>> + Send;

    /// Replaces the password hash of a super-admin. Returns `None` if the
    /// account was not found.
    fn update_super_admin_password(
        &mut self,
        admin_id: Uuid,
        password_hash: String,
    ) -> impl Future<Output = PgResult<Option<SuperAdmin>>> + Send;

    /// Sets the activation flag of a super-admin. Returns `None` if the
    /// account was not found.
    fn set_super_admin_active(
        &mut self,
        admin_id: Uuid,
        is_active: bool,
    ) -> impl Future<Output = PgResult<Option<SuperAdmin>>> + Send;

    /// Lists super-admins ordered by creation time, most recent first.
    fn list_super_admins(
        &mut self,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<SuperAdmin>>> + Send;
}

impl SuperAdminRepository for PgConnection {
    async fn create_super_admin(&mut self, mut new_admin: NewSuperAdmin) -> PgResult<SuperAdmin> {
        use schema::super_admins;

        new_admin.email_address = new_admin.email_address.trim().to_lowercase();

        diesel::insert_into(super_admins::table)
            .values(&new_admin)
            .returning(SuperAdmin::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_super_admin_by_id(&mut self, admin_id: Uuid) -> PgResult<Option<SuperAdmin>> {
        use schema::super_admins::{self, dsl};

        super_admins::table
            .filter(dsl::id.eq(admin_id))
            .select(SuperAdmin::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_super_admin_by_email(&mut self, email: &str) -> PgResult<Option<SuperAdmin>> {
        use schema::super_admins::{self, dsl};

        super_admins::table
            .filter(dsl::email_address.eq(email.trim().to_lowercase()))
            .select(SuperAdmin::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn update_super_admin(
        &mut self,
        admin_id: Uuid,
        updates: UpdateSuperAdmin,
    ) -> PgResult<Option<SuperAdmin>> {
        use schema::super_admins::{self, dsl};

        // An all-`None` changeset would fail inside diesel's query builder.
        if updates.is_empty() {
            return self.find_super_admin_by_id(admin_id).await;
        }

        diesel::update(super_admins::table.filter(dsl::id.eq(admin_id)))
            .set(&updates)
            .returning(SuperAdmin::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn update_super_admin_password(
        &mut self,
        admin_id: Uuid,
        password_hash: String,
    ) -> PgResult<Option<SuperAdmin>> {
        self.update_super_admin(
            admin_id,
            UpdateSuperAdmin {
                password_hash: Some(password_hash),
                ..Default::default()
            },
        )
        .await
    }

    async fn set_super_admin_active(
        &mut self,
        admin_id: Uuid,
        is_active: bool,
    ) -> PgResult<Option<SuperAdmin>> {
        self.update_super_admin(
            admin_id,
            UpdateSuperAdmin {
                is_active: Some(is_active),
                ..Default::default()
            },
        )
        .await
    }

    async fn list_super_admins(&mut self, pagination: Pagination) -> PgResult<Vec<SuperAdmin>> {
        use schema::super_admins::{self, dsl};

        super_admins::table
            .order(dsl::created_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(SuperAdmin::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }
}
