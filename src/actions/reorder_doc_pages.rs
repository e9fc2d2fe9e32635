use std::collections::HashSet;

use uuid::Uuid;

use super::guard;
use crate::access::Principal;
use crate::repository::{DocPage, DocSpaceRepository};
use crate::SwiftError;

/// Rewrites page order from a full list of page ids.
///
/// The list must name every page of the space exactly once; positions are
/// renumbered `1..=n` in list order.
pub struct ReorderDocPagesAction<D: DocSpaceRepository> {
    spaces: D,
}

impl<D: DocSpaceRepository> ReorderDocPagesAction<D> {
    pub fn new(spaces: D) -> Self {
        Self { spaces }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "reorder_doc_pages", skip_all, err)
    )]
    pub async fn execute(
        &self,
        principal: &Principal,
        space_id: Uuid,
        page_ids: &[Uuid],
    ) -> Result<Vec<DocPage>, SwiftError> {
        let space = self.spaces.find_space(space_id).await?;
        guard(principal, space_id, space.as_ref(), true).await?;

        let pages = self.spaces.list_pages(space_id).await?;
        let existing: HashSet<Uuid> = pages.iter().map(|p| p.id).collect();
        let requested: HashSet<Uuid> = page_ids.iter().copied().collect();
        if requested.len() != page_ids.len() || requested != existing {
            return Err(SwiftError::Validation(
                "Page order must list every page exactly once".to_owned(),
            ));
        }

        let orders: Vec<(Uuid, i32)> = page_ids.iter().copied().zip(1..).collect();
        self.spaces.set_page_orders(space_id, &orders).await?;

        self.spaces.list_pages(space_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::fixtures;
    use crate::repository::{MockDocSpaceRepository, NewDocPage, NewDocSpace, Ownership};

    async fn space_with_pages(
        repo: &MockDocSpaceRepository,
        ownership: Ownership,
        n: i32,
    ) -> (Uuid, Vec<Uuid>) {
        let space = repo
            .create_space(NewDocSpace {
                ownership,
                name: "Notes".to_owned(),
            })
            .await
            .unwrap();
        let mut ids = Vec::new();
        for order in 1..=n {
            let page = repo
                .create_page(NewDocPage {
                    space_id: space.id,
                    title: format!("Page {order}"),
                    content: String::new(),
                    order,
                })
                .await
                .unwrap();
            ids.push(page.id);
        }
        (space.id, ids)
    }

    #[tokio::test]
    async fn test_reverses_order() {
        let repo = MockDocSpaceRepository::new();
        let solo = fixtures::solo();
        let (space_id, mut ids) =
            space_with_pages(&repo, Ownership::Personal(solo.user_id), 3).await;
        ids.reverse();

        let pages = ReorderDocPagesAction::new(repo)
            .execute(&solo, space_id, &ids)
            .await
            .unwrap();

        let listed: Vec<Uuid> = pages.iter().map(|p| p.id).collect();
        assert_eq!(listed, ids);
        let orders: Vec<i32> = pages.iter().map(|p| p.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_partial_or_duplicate_lists_rejected() {
        let repo = MockDocSpaceRepository::new();
        let solo = fixtures::solo();
        let (space_id, ids) = space_with_pages(&repo, Ownership::Personal(solo.user_id), 2).await;
        let action = ReorderDocPagesAction::new(repo);

        let partial = action.execute(&solo, space_id, &ids[..1]).await;
        assert!(matches!(partial, Err(SwiftError::Validation(_))));

        let duplicate = action.execute(&solo, space_id, &[ids[0], ids[0]]).await;
        assert!(matches!(duplicate, Err(SwiftError::Validation(_))));

        let foreign = action.execute(&solo, space_id, &[ids[0], Uuid::new_v4()]).await;
        assert!(matches!(foreign, Err(SwiftError::Validation(_))));
    }

    #[tokio::test]
    async fn test_member_cannot_reorder_team_space() {
        let repo = MockDocSpaceRepository::new();
        let team = Uuid::new_v4();
        let (space_id, ids) = space_with_pages(&repo, Ownership::Team(team), 2).await;

        let result = ReorderDocPagesAction::new(repo)
            .execute(&fixtures::member(team), space_id, &ids)
            .await;
        assert_eq!(result.unwrap_err(), SwiftError::Forbidden);
    }
}
