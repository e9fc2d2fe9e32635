use uuid::Uuid;

use super::{created, guard};
use crate::access::Principal;
use crate::api::CreateDocPageRequest;
use crate::repository::{DocPage, DocSpaceRepository, NewDocPage};
use crate::validators::{TitleRule, validate_title};
use crate::SwiftError;

/// Appends a page to a space the principal manages.
pub struct CreateDocPageAction<D: DocSpaceRepository> {
    spaces: D,
}

impl<D: DocSpaceRepository> CreateDocPageAction<D> {
    pub fn new(spaces: D) -> Self {
        Self { spaces }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "create_doc_page", skip_all, err)
    )]
    pub async fn execute(
        &self,
        principal: &Principal,
        space_id: Uuid,
        request: &CreateDocPageRequest,
    ) -> Result<DocPage, SwiftError> {
        let space = self.spaces.find_space(space_id).await?;
        guard(principal, space_id, space.as_ref(), true).await?;

        let title = request.title.trim();
        validate_title(title, TitleRule::DOC_PAGE)?;

        let last = self
            .spaces
            .list_pages(space_id)
            .await?
            .iter()
            .map(|p| p.order)
            .max()
            .unwrap_or(0);

        let page = self
            .spaces
            .create_page(NewDocPage {
                space_id,
                title: title.to_owned(),
                content: request.content.clone(),
                order: last + 1,
            })
            .await?;
        created("doc_page", page.id, principal).await;

        Ok(page)
    }
}
