use crate::access::Principal;
use crate::repository::{DocSpace, DocSpaceRepository};
use crate::SwiftError;

/// Personal spaces plus the spaces of the caller's team.
pub struct ListDocSpacesAction<D: DocSpaceRepository> {
    spaces: D,
}

impl<D: DocSpaceRepository> ListDocSpacesAction<D> {
    pub fn new(spaces: D) -> Self {
        Self { spaces }
    }

    pub async fn execute(&self, principal: &Principal) -> Result<Vec<DocSpace>, SwiftError> {
        self.spaces
            .list_spaces_for(principal.user_id, principal.team_id())
            .await
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::actions::fixtures;
    use crate::repository::{MockDocSpaceRepository, NewDocSpace, Ownership};

    #[tokio::test]
    async fn test_lists_personal_and_team_spaces_only() {
        let repo = MockDocSpaceRepository::new();
        let team = Uuid::new_v4();
        let member = fixtures::member(team);

        for ownership in [
            Ownership::Personal(member.user_id),
            Ownership::Team(team),
            Ownership::Personal(Uuid::new_v4()),
            Ownership::Team(Uuid::new_v4()),
        ] {
            repo.create_space(NewDocSpace {
                ownership,
                name: "Space".to_owned(),
            })
            .await
            .unwrap();
        }

        let spaces = ListDocSpacesAction::new(repo).execute(&member).await.unwrap();
        assert_eq!(spaces.len(), 2);
    }
}
