//! Customer repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff::Timestamp;
use uuid::Uuid;

use crate::model::{Customer, NewCustomer, UpdateCustomer};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for public customer account operations.
pub trait CustomerRepository {
    /// Creates a new customer account.
    fn create_customer(
        &mut self,
        new_customer: NewCustomer,
    ) -> impl Future<Output = PgResult<Customer>> + Send;

    /// Finds a customer by its unique identifier.
    fn find_customer_by_id(
        &mut self,
        customer_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Customer>>> + Send;

    /// Finds a customer by email address.
    ///
    /// Email comparison is case-insensitive; the stored value is lowercase.
    fn find_customer_by_email(
        &mut self,
        email: &str,
    ) -> impl Future<Output = PgResult<Option<Customer>>> + Send;

    /// Applies partial updates to a customer. Returns `None` if the account
    /// was not found.
    fn update_customer(
        &mut self,
        customer_id: Uuid,
        updates: UpdateCustomer,
    ) -> impl Future<Output = PgResult<Option<Customer>>> + Send;

    /// Sets the password hash of a customer. Returns `None` if the account
    /// was not found.
    fn update_customer_password(
        &mut self,
        customer_id: Uuid,
        password_hash: String,
    ) -> impl Future<Output = PgResult<Option<Customer>>> + Send;

    /// Records a successful login at the current time.
    fn touch_customer_login(
        &mut self,
        customer_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Customer>>> + Send;

    /// Records authenticated activity at the current time.
    ///
    /// Called from the request guard; failures here must not fail the
    /// guarded request.
    fn touch_customer_activity(
        &mut self,
        customer_id: Uuid,
    ) -> impl Future<Output = PgResult<()>> + Send;
}

impl CustomerRepository for PgConnection {
    async fn create_customer(&mut self, mut new_customer: NewCustomer) -> PgResult<Customer> {
        use schema::customers;

        new_customer.email_address = new_customer.email_address.trim().to_lowercase();
        new_customer.display_name = new_customer.display_name.trim().to_owned();

        diesel::insert_into(customers::table)
            .values(&new_customer)
            .returning(Customer::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_customer_by_id(&mut self, customer_id: Uuid) -> PgResult<Option<Customer>> {
        use schema::customers::{self, dsl};

        customers::table
            .filter(dsl::id.eq(customer_id))
            .select(Customer::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_customer_by_email(&mut self, email: &str) -> PgResult<Option<Customer>> {
        use schema::customers::{self, dsl};

        customers::table
            .filter(dsl::email_address.eq(email.trim().to_lowercase()))
            .select(Customer::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn update_customer(
        &mut self,
        customer_id: Uuid,
        mut updates: UpdateCustomer,
    ) -> PgResult<Option<Customer>> {
        use schema::customers::{self, dsl};

        // An all-`None` changeset would fail inside diesel's query builder.
        if updates.is_empty() {
            return self.find_customer_by_id(customer_id).await;
        }

        if let Some(name) = updates.display_name.as_mut() {
            *name = name.trim().to_owned();
        }

        diesel::update(customers::table.filter(dsl::id.eq(customer_id)))
            .set(&updates)
            .returning(Customer::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn update_customer_password(
        &mut self,
        customer_id: Uuid,
        password_hash: String,
    ) -> PgResult<Option<Customer>> {
        self.update_customer(
            customer_id,
            UpdateCustomer {
                password_hash: Some(password_hash),
                ..Default::default()
            },
        )
        .await
    }

    async fn touch_customer_login(&mut self, customer_id: Uuid) -> PgResult<Option<Customer>> {
        self.update_customer(
            customer_id,
            UpdateCustomer {
                last_login_at: Some(jiff_diesel::Timestamp::from(Timestamp::now())),
                ..Default::default()
            },
        )
        .await
    }

    async fn touch_customer_activity(&mut self, customer_id: Uuid) -> PgResult<()> {
        use schema::customers::{self, dsl};

        diesel::update(customers::table.filter(dsl::id.eq(customer_id)))
            .set(dsl::last_active_at.eq(Some(jiff_diesel::Timestamp::from(Timestamp::now()))))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(())
    }
}
