//! Catalog content item model.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::content_items;
use crate::types::ContentRoute;

/// A single catalog entry belonging to one content route.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = content_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ContentItem {
    /// Unique item identifier.
    pub id: Uuid,
    /// Content section this item belongs to.
    pub route: ContentRoute,
    /// Item title.
    pub title: String,
    /// Whether the item is publicly visible.
    pub is_active: bool,
    /// Editor who authored the item.
    pub author_id: Uuid,
    /// Timestamp when the item was created.
    pub created_at: Timestamp,
}

/// Data for creating a new content item.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = content_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewContentItem {
    /// Content section this item belongs to.
    pub route: ContentRoute,
    /// Item title.
    pub title: String,
    /// Editor who authored the item.
    pub author_id: Uuid,
}

/// Data for updating a content item.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = content_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateContentItem {
    /// Item title.
    pub title: Option<String>,
    /// Visibility flag.
    pub is_active: Option<bool>,
}
