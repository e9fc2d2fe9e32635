use super::created;
use crate::access::Principal;
use crate::api::CreateDocSpaceRequest;
use crate::repository::{DocSpace, DocSpaceRepository, NewDocSpace, Ownership};
use crate::validators::{TitleRule, validate_title};
use crate::SwiftError;

/// Creates a personal space, or a team space when the caller owns the team.
pub struct CreateDocSpaceAction<D: DocSpaceRepository> {
    spaces: D,
}

impl<D: DocSpaceRepository> CreateDocSpaceAction<D> {
    pub fn new(spaces: D) -> Self {
        Self { spaces }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "create_doc_space", skip_all, err)
    )]
    pub async fn execute(
        &self,
        principal: &Principal,
        request: &CreateDocSpaceRequest,
    ) -> Result<DocSpace, SwiftError> {
        let name = request.name.trim();
        validate_title(name, TitleRule::DOC_SPACE)?;

        let ownership = if request.team {
            match principal.team_id() {
                Some(team_id) if principal.profile.owns_team() => Ownership::Team(team_id),
                _ => return Err(SwiftError::Forbidden),
            }
        } else {
            Ownership::Personal(principal.user_id)
        };

        let space = self
            .spaces
            .create_space(NewDocSpace {
                ownership,
                name: name.to_owned(),
            })
            .await?;
        created("doc_space", space.id, principal).await;

        Ok(space)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::actions::fixtures;
    use crate::repository::MockDocSpaceRepository;

    fn request(name: &str, team: bool) -> CreateDocSpaceRequest {
        CreateDocSpaceRequest {
            name: name.to_owned(),
            team,
        }
    }

    #[tokio::test]
    async fn test_personal_space() {
        let action = CreateDocSpaceAction::new(MockDocSpaceRepository::new());
        let solo = fixtures::solo();

        let space = action.execute(&solo, &request(" Notes ", false)).await.unwrap();
        assert_eq!(space.name, "Notes");
        assert_eq!(space.ownership, Ownership::Personal(solo.user_id));
    }

    #[tokio::test]
    async fn test_team_space_requires_owner() {
        let action = CreateDocSpaceAction::new(MockDocSpaceRepository::new());
        let team = Uuid::new_v4();

        let space = action
            .execute(&fixtures::owner(team), &request("Handbook", true))
            .await
            .unwrap();
        assert_eq!(space.ownership, Ownership::Team(team));

        let member = action
            .execute(&fixtures::member(team), &request("Handbook", true))
            .await;
        assert_eq!(member.unwrap_err(), SwiftError::Forbidden);

        let solo = action.execute(&fixtures::solo(), &request("Handbook", true)).await;
        assert_eq!(solo.unwrap_err(), SwiftError::Forbidden);
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let action = CreateDocSpaceAction::new(MockDocSpaceRepository::new());
        let result = action.execute(&fixtures::solo(), &request("   ", false)).await;
        assert!(matches!(result, Err(SwiftError::Validation(_))));
    }
}
