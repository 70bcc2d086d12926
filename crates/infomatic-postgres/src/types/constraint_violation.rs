//! Structured mapping of named database constraints.

use std::fmt;

/// Broad category of a violated constraint.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ConstraintCategory {
    /// A unique index rejected a duplicate value.
    Unique,
    /// A check constraint rejected an invalid value.
    Check,
    /// A foreign key referenced a missing row.
    ForeignKey,
}

/// A known, named constraint from the database schema.
///
/// Uniqueness of emails and usernames is enforced by the store, not by
/// read-then-write checks in handlers. When an insert or update trips one of
/// these constraints the raw error carries the constraint name; this type
/// turns that name back into something a handler can map to a precise
/// conflict message.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ConstraintViolation {
    /// Duplicate super-admin email address.
    SuperAdminEmailAddress,
    /// Duplicate editor username.
    EditorUsername,
    /// Duplicate editor email address.
    EditorEmailAddress,
    /// Editor permission array must not be empty.
    EditorRoutesNotEmpty,
    /// Duplicate customer email address.
    CustomerEmailAddress,
    /// Content item references a missing editor.
    ContentItemAuthor,
}

impl ConstraintViolation {
    /// Resolves a raw constraint name into a known violation.
    ///
    /// Returns `None` for constraint names this crate does not recognize,
    /// which callers should treat as an internal error rather than a
    /// user-correctable conflict.
    pub fn new(constraint: &str) -> Option<Self> {
        match constraint {
            "super_admins_email_address_key" => Some(Self::SuperAdminEmailAddress),
            "editors_username_key" => Some(Self::EditorUsername),
            "editors_email_address_key" => Some(Self::EditorEmailAddress),
            "editors_routes_not_empty" => Some(Self::EditorRoutesNotEmpty),
            "customers_email_address_key" => Some(Self::CustomerEmailAddress),
            "content_items_author_id_fkey" => Some(Self::ContentItemAuthor),
            _ => None,
        }
    }

    /// Returns the category of this constraint.
    pub fn category(&self) -> ConstraintCategory {
        match self {
            Self::SuperAdminEmailAddress
            | Self::EditorUsername
            | Self::EditorEmailAddress
            | Self::CustomerEmailAddress => ConstraintCategory::Unique,
            Self::EditorRoutesNotEmpty => ConstraintCategory::Check,
            Self::ContentItemAuthor => ConstraintCategory::ForeignKey,
        }
    }

    /// Returns the field name the violation should be reported against.
    pub fn field(&self) -> &'static str {
        match self {
            Self::SuperAdminEmailAddress
            | Self::EditorEmailAddress
            | Self::CustomerEmailAddress => "email",
            Self::EditorUsername => "username",
            Self::EditorRoutesNotEmpty => "routes",
            Self::ContentItemAuthor => "author",
        }
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::SuperAdminEmailAddress => "an admin with this email already exists",
            Self::EditorUsername => "this username is already taken",
            Self::EditorEmailAddress => "an editor with this email already exists",
            Self::EditorRoutesNotEmpty => "at least one route permission is required",
            Self::CustomerEmailAddress => "an account with this email already exists",
            Self::ContentItemAuthor => "the referenced author does not exist",
        };

        f.write_str(message)
    }
}

#[cfg(test)]
mod test {
    use super::{ConstraintCategory, ConstraintViolation};

    #[test]
    fn resolves_known_constraint_names() {
        let cases = [
            ("super_admins_email_address_key", ConstraintViolation::SuperAdminEmailAddress),
            ("editors_username_key", ConstraintViolation::EditorUsername),
            ("editors_email_address_key", ConstraintViolation::EditorEmailAddress),
            ("editors_routes_not_empty", ConstraintViolation::EditorRoutesNotEmpty),
            ("customers_email_address_key", ConstraintViolation::CustomerEmailAddress),
            ("content_items_author_id_fkey", ConstraintViolation::ContentItemAuthor),
        ];

        for (name, expected) in cases {
            assert_eq!(ConstraintViolation::new(name), Some(expected));
        }
    }

    #[test]
    fn unknown_constraint_is_none() {
        assert!(ConstraintViolation::new("some_other_index").is_none());
    }

    #[test]
    fn unique_violations_report_a_field() {
        let violation = ConstraintViolation::EditorUsername;
        assert_eq!(violation.category(), ConstraintCategory::Unique);
        assert_eq!(violation.field(), "username");
    }
}
