//! Public customer account model.
//!
//! Customers are the site's public users. They may register with an email
//! and password, with Google sign-in, or both; a Google-only account has no
//! password hash until the owner explicitly creates one.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::customers;

/// A public customer account.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Customer {
    /// Unique account identifier.
    pub id: Uuid,
    /// Login email, unique and stored lowercase.
    pub email_address: String,
    /// Argon2 password hash. `None` for Google-only accounts.
    pub password_hash: Option<String>,
    /// Human-readable display name.
    pub display_name: String,
    /// Optional URL to a profile avatar image.
    pub avatar_url: Option<String>,
    /// Optional self-reported country.
    pub country: Option<String>,
    /// Whether this account has been linked to a Google identity.
    pub is_google_linked: bool,
    /// Timestamp when the account was created.
    pub created_at: Timestamp,
    /// Timestamp of the most recent successful login.
    pub last_login_at: Option<Timestamp>,
    /// Timestamp of the most recent authenticated request.
    pub last_active_at: Option<Timestamp>,
}

/// Data for creating a new customer.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewCustomer {
    /// Login email address.
    pub email_address: String,
    /// Argon2 password hash. `None` for Google sign-ups.
    pub password_hash: Option<String>,
    /// Human-readable display name.
    pub display_name: String,
    /// Optional URL to a profile avatar image.
    pub avatar_url: Option<String>,
    /// Optional self-reported country.
    pub country: Option<String>,
    /// Whether the account starts life linked to Google.
    pub is_google_linked: bool,
}

/// Data for updating a customer.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateCustomer {
    /// Argon2 password hash.
    pub password_hash: Option<String>,
    /// Human-readable display name.
    pub display_name: Option<String>,
    /// URL to a profile avatar image.
    pub avatar_url: Option<String>,
    /// Self-reported country.
    pub country: Option<String>,
    /// Google linkage flag.
    pub is_google_linked: Option<bool>,
    /// Timestamp of the most recent successful login.
    pub last_login_at: Option<Timestamp>,
    /// Timestamp of the most recent authenticated request.
    pub last_active_at: Option<Timestamp>,
}

impl UpdateCustomer {
    /// Returns whether every field is unset.
    ///
    /// Diesel rejects an all-`None` changeset as a query-builder error, so
    /// callers skip the update entirely when there is nothing to change.
    pub fn is_empty(&self) -> bool {
        self.password_hash.is_none()
            && self.display_name.is_none()
            && self.avatar_url.is_none()
            && self.country.is_none()
            && self.is_google_linked.is_none()
            && self.last_login_at.is_none()
            && self.last_active_at.is_none()
    }
}

impl Customer {
    /// Returns whether the account has a password credential.
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Returns whether the account may log in with a password.
    ///
    /// Google-only accounts fail password login the same way a wrong
    /// password does, so the response never reveals which credential the
    /// account actually carries.
    pub fn can_password_login(&self) -> bool {
        self.has_password()
    }

    /// Returns whether the account may create a first password.
    ///
    /// Only Google-linked accounts without an existing password qualify;
    /// changing an existing password is a different, verified flow.
    pub fn can_create_password(&self) -> bool {
        self.is_google_linked && !self.has_password()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_changeset_is_detected() {
        assert!(UpdateCustomer::default().is_empty());

        let updates = UpdateCustomer {
            display_name: Some("New Name".to_owned()),
            ..Default::default()
        };
        assert!(!updates.is_empty());
    }
}
