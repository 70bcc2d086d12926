//! Catalog content repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use super::Pagination;
use crate::model::{ContentItem, NewContentItem};
use crate::types::ContentRoute;
use crate::{PgConnection, PgError, PgResult, schema};

/// Filters for listing catalog content.
///
/// Listing is always scoped to one route and one author: editors only ever
/// see their own items, even on routes they share with other editors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentFilter {
    /// Content section to list.
    pub route: ContentRoute,
    /// Author whose items to list.
    pub author_id: Uuid,
    /// Optional visibility filter. `None` lists both active and inactive.
    pub is_active: Option<bool>,
}

/// Repository for catalog content operations.
pub trait ContentRepository {
    /// Creates a new content item.
    fn create_content_item(
        &mut self,
        new_item: NewContentItem,
    ) -> impl Future<Output = PgResult<ContentItem>> + Send;

    /// Lists content items matching `filter`, most recent first.
    fn list_content_items(
        &mut self,
        filter: ContentFilter,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<ContentItem>>> + Send;

    /// Counts content items matching `filter`.
    fn count_content_items(
        &mut self,
        filter: ContentFilter,
    ) -> impl Future<Output = PgResult<i64>> + Send;
}

impl ContentRepository for PgConnection {
    async fn create_content_item(&mut self, mut new_item: NewContentItem) -> PgResult<ContentItem> {
        use schema::content_items;

        new_item.title = new_item.title.trim().to_owned();

        diesel::insert_into(content_items::table)
            .values(&new_item)
            .returning(ContentItem::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn list_content_items(
        &mut self,
        filter: ContentFilter,
        pagination: Pagination,
    ) -> PgResult<Vec<ContentItem>> {
        use schema::content_items::{self, dsl};

        let mut query = content_items::table
            .filter(dsl::route.eq(filter.route))
            .filter(dsl::author_id.eq(filter.author_id))
            .into_boxed();

        if let Some(is_active) = filter.is_active {
            query = query.filter(dsl::is_active.eq(is_active));
        }

        query
            .order(dsl::created_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(ContentItem::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn count_content_items(&mut self, filter: ContentFilter) -> PgResult<i64> {
        use schema::content_items::{self, dsl};

        let mut query = content_items::table
            .filter(dsl::route.eq(filter.route))
            .filter(dsl::author_id.eq(filter.author_id))
            .into_boxed();

        if let Some(is_active) = filter.is_active {
            query = query.filter(dsl::is_active.eq(is_active));
        }

        query.count().get_result(self).await.map_err(PgError::from)
    }
}
