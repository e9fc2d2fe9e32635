use super::created;
use crate::access::Principal;
use crate::api::CreateProjectRequest;
use crate::repository::{NewProject, Ownership, Project, ProjectRepository};
use crate::validators::{TitleRule, validate_title};
use crate::SwiftError;

/// Creates a personal project, or a team project when the caller owns the team.
pub struct CreateProjectAction<R: ProjectRepository> {
    projects: R,
}

impl<R: ProjectRepository> CreateProjectAction<R> {
    pub fn new(projects: R) -> Self {
        Self { projects }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "create_project", skip_all, err)
    )]
    pub async fn execute(
        &self,
        principal: &Principal,
        request: &CreateProjectRequest,
    ) -> Result<Project, SwiftError> {
        let title = request.title.trim();
        validate_title(title, TitleRule::PROJECT)?;

        let ownership = match (request.team, principal.team_id()) {
            (false, _) => Ownership::Personal(principal.user_id),
            (true, Some(team_id)) if principal.profile.owns_team() => Ownership::Team(team_id),
            (true, _) => return Err(SwiftError::Forbidden),
        };

        let project = self
            .projects
            .create_project(NewProject {
                ownership,
                title: title.to_owned(),
            })
            .await?;
        created("project", project.id, principal).await;

        Ok(project)
    }
}
