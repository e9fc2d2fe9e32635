use crate::access::Principal;
use crate::repository::{Project, ProjectRepository};
use crate::SwiftError;

/// Personal projects plus the projects of the caller's team.
pub struct ListProjectsAction<R: ProjectRepository> {
    projects: R,
}

impl<R: ProjectRepository> ListProjectsAction<R> {
    pub fn new(projects: R) -> Self {
        Self { projects }
    }

    pub async fn execute(&self, principal: &Principal) -> Result<Vec<Project>, SwiftError> {
        self.projects
            .list_projects_for(principal.user_id, principal.team_id())
            .await
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::actions::fixtures;
    use crate::repository::{MockProjectRepository, NewProject, Ownership};

    #[tokio::test]
    async fn test_solo_sees_only_own_projects() {
        let repo = MockProjectRepository::new();
        let solo = fixtures::solo();
        for ownership in [
            Ownership::Personal(solo.user_id),
            Ownership::Team(Uuid::new_v4()),
        ] {
            repo.create_project(NewProject {
                ownership,
                title: "Launch".to_owned(),
            })
            .await
            .unwrap();
        }

        let projects = ListProjectsAction::new(repo).execute(&solo).await.unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].ownership, Ownership::Personal(solo.user_id));
    }
}
