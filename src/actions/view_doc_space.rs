use uuid::Uuid;

use super::guard;
use crate::access::Principal;
use crate::api::DocSpaceView;
use crate::repository::DocSpaceRepository;
use crate::SwiftError;

/// Loads a space and its pages after the access check.
///
/// A missing space is [`SwiftError::NotFound`]; one the principal cannot
/// see is [`SwiftError::Forbidden`].
pub struct ViewDocSpaceAction<D: DocSpaceRepository> {
    spaces: D,
}

impl<D: DocSpaceRepository> ViewDocSpaceAction<D> {
    pub fn new(spaces: D) -> Self {
        Self { spaces }
    }

    pub async fn execute(
        &self,
        principal: &Principal,
        space_id: Uuid,
    ) -> Result<DocSpaceView, SwiftError> {
        let space = self.spaces.find_space(space_id).await?;
        let grant = guard(principal, space_id, space.as_ref(), false).await?;
        let space = space.ok_or(SwiftError::NotFound)?;

        let pages = self.spaces.list_pages(space.id).await?;

        Ok(DocSpaceView {
            space,
            pages,
            can_manage: grant.can_manage,
        })
    }
}
