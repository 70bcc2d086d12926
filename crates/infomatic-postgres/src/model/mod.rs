//! Database models for all principal classes and content.
//!
//! Each table has three shapes: the full row model (`Queryable`/`Selectable`),
//! an insert model (`New*`, `Insertable`), and a partial-update model
//! (`Update*`, `AsChangeset`). Handlers never build raw SQL; they work with
//! these types through the repository traits in [`crate::query`].

mod content_item;
mod customer;
mod editor;
mod super_admin;

pub use content_item::{ContentItem, NewContentItem, UpdateContentItem};
pub use customer::{Customer, NewCustomer, UpdateCustomer};
pub use editor::{Editor, NewEditor, UpdateEditor};
pub use super_admin::{NewSuperAdmin, SuperAdmin, UpdateSuperAdmin};
