//! Database enumeration and constraint types for type-safe queries.
//!
//! This module provides strongly-typed enumerations that correspond to
//! PostgreSQL ENUM types defined in the database schema, plus the structured
//! constraint-violation mapping used to turn unique-index errors into
//! user-correctable conflicts.

mod admin_role;
mod constraint_violation;
mod content_route;

pub use admin_role::AdminRole;
pub use constraint_violation::{ConstraintCategory, ConstraintViolation};
pub use content_route::ContentRoute;
