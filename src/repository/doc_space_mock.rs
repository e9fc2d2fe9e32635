#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::SwiftError;

use super::doc_space::{
    DocPage, DocSpace, DocSpaceRepository, NewDocPage, NewDocSpace, sort_pages,
};

#[derive(Clone, Default)]
pub struct MockDocSpaceRepository {
    pub spaces: Arc<Mutex<Vec<DocSpace>>>,
    pub pages: Arc<Mutex<Vec<DocPage>>>,
}

impl MockDocSpaceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocSpaceRepository for MockDocSpaceRepository {
    async fn create_space(&self, data: NewDocSpace) -> Result<DocSpace, SwiftError> {
        let space = DocSpace {
            id: Uuid::new_v4(),
            ownership: data.ownership,
            name: data.name,
            created_at: Utc::now(),
        };

        let mut spaces = self.spaces.lock().unwrap();
        spaces.push(space.clone());
        drop(spaces);

        Ok(space)
    }

    async fn find_space(&self, id: Uuid) -> Result<Option<DocSpace>, SwiftError> {
        let spaces = self.spaces.lock().unwrap();
        Ok(spaces.iter().find(|s| s.id == id).cloned())
    }

    async fn list_spaces_for(
        &self,
        user_id: Uuid,
        team_id: Option<Uuid>,
    ) -> Result<Vec<DocSpace>, SwiftError> {
        let spaces = self.spaces.lock().unwrap();
        let mut visible: Vec<DocSpace> = spaces
            .iter()
            .filter(|s| {
                s.ownership.owner_id() == Some(user_id)
                    || (team_id.is_some() && s.ownership.team_id() == team_id)
            })
            .cloned()
            .collect();
        drop(spaces);

        visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(visible)
    }

    async fn list_pages(&self, space_id: Uuid) -> Result<Vec<DocPage>, SwiftError> {
        let pages = self.pages.lock().unwrap();
        let mut in_space: Vec<DocPage> = pages
            .iter()
            .filter(|p| p.space_id == space_id)
            .cloned()
            .collect();
        drop(pages);

        sort_pages(&mut in_space);
        Ok(in_space)
    }

    async fn create_page(&self, data: NewDocPage) -> Result<DocPage, SwiftError> {
        if !self
            .spaces
            .lock()
            .unwrap()
            .iter()
            .any(|s| s.id == data.space_id)
        {
            return Err(SwiftError::NotFound);
        }

        let now = Utc::now();
        let page = DocPage {
            id: Uuid::new_v4(),
            space_id: data.space_id,
            title: data.title,
            content: data.content,
            order: data.order,
            created_at: now,
            updated_at: now,
        };

        let mut pages = self.pages.lock().unwrap();
        pages.push(page.clone());
        drop(pages);

        Ok(page)
    }

    async fn set_page_orders(
        &self,
        space_id: Uuid,
        orders: &[(Uuid, i32)],
    ) -> Result<(), SwiftError> {
        let mut pages = self.pages.lock().unwrap();
        let all_in_space = orders
            .iter()
            .all(|(id, _)| pages.iter().any(|p| p.id == *id && p.space_id == space_id));
        if !all_in_space {
            return Err(SwiftError::NotFound);
        }

        let now = Utc::now();
        for (id, order) in orders {
            if let Some(page) = pages.iter_mut().find(|p| p.id == *id) {
                page.order = *order;
                page.updated_at = now;
            }
        }
        drop(pages);
        Ok(())
    }
}
