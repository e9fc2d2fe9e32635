use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Ownership;
use crate::SwiftError;

/// A named documentation container owned by a user or by a team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocSpace {
    pub id: Uuid,
    pub ownership: Ownership,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocPage {
    pub id: Uuid,
    pub space_id: Uuid,
    pub title: String,
    pub content: String,
    /// Display position inside the space, ascending.
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDocSpace {
    pub ownership: Ownership,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct NewDocPage {
    pub space_id: Uuid,
    pub title: String,
    pub content: String,
    pub order: i32,
}

/// Sorts pages for display: by `order`, then by creation time.
pub fn sort_pages(pages: &mut [DocPage]) {
    pages.sort_by(|a, b| {
        a.order
            .cmp(&b.order)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}

#[async_trait]
pub trait DocSpaceRepository: Send + Sync {
    async fn create_space(&self, data: NewDocSpace) -> Result<DocSpace, SwiftError>;

    async fn find_space(&self, id: Uuid) -> Result<Option<DocSpace>, SwiftError>;

    /// Personal spaces of `user_id` plus the spaces of `team_id`, newest first.
    async fn list_spaces_for(
        &self,
        user_id: Uuid,
        team_id: Option<Uuid>,
    ) -> Result<Vec<DocSpace>, SwiftError>;

    /// Pages of a space in display order.
    async fn list_pages(&self, space_id: Uuid) -> Result<Vec<DocPage>, SwiftError>;

    async fn create_page(&self, data: NewDocPage) -> Result<DocPage, SwiftError>;

    /// Rewrites page positions. All ids must belong to the space.
    async fn set_page_orders(
        &self,
        space_id: Uuid,
        orders: &[(Uuid, i32)],
    ) -> Result<(), SwiftError>;
}
