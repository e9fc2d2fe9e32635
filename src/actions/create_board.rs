use uuid::Uuid;

use super::view_project::board_view;
use super::{created, guard};
use crate::access::Principal;
use crate::api::{BoardView, CreateBoardRequest};
use crate::repository::{BOARD_INDEX_RANGE, NewBoard, ProjectRepository};
use crate::validators::{TitleRule, validate_title};
use crate::SwiftError;

pub const DEFAULT_COLUMNS: [&str; 3] = ["To Do", "In Progress", "Done"];
pub const DEFAULT_STATUSES: [&str; 3] = ["To Do", "In Progress", "Done"];

/// Adds a board with the default lanes to a project the principal manages.
pub struct CreateBoardAction<R: ProjectRepository> {
    projects: R,
}

impl<R: ProjectRepository> CreateBoardAction<R> {
    pub fn new(projects: R) -> Self {
        Self { projects }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "create_board", skip_all, err)
    )]
    pub async fn execute(
        &self,
        principal: &Principal,
        project_id: Uuid,
        request: &CreateBoardRequest,
    ) -> Result<BoardView, SwiftError> {
        let project = self.projects.find_project(project_id).await?;
        guard(principal, project_id, project.as_ref(), true).await?;

        let title = request.title.trim();
        validate_title(title, TitleRule::BOARD)?;

        let next_index = self
            .projects
            .list_boards(project_id)
            .await?
            .iter()
            .map(|b| b.board_index)
            .max()
            .unwrap_or(0)
            + 1;
        if !BOARD_INDEX_RANGE.contains(&next_index) {
            return Err(SwiftError::Validation(format!(
                "A project can have at most {} boards",
                BOARD_INDEX_RANGE.end()
            )));
        }

        let board = self
            .projects
            .create_board(NewBoard {
                project_id,
                title: title.to_owned(),
                board_index: next_index,
                columns: DEFAULT_COLUMNS.map(str::to_owned).to_vec(),
                statuses: DEFAULT_STATUSES.map(str::to_owned).to_vec(),
            })
            .await?;
        created("board", board.id, principal).await;

        board_view(&self.projects, board).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::fixtures;
    use crate::repository::{MockProjectRepository, NewProject, Ownership};

    fn request(title: &str) -> CreateBoardRequest {
        CreateBoardRequest {
            title: title.to_owned(),
        }
    }

    #[tokio::test]
    async fn test_board_gets_default_lanes() {
        let repo = MockProjectRepository::new();
        let solo = fixtures::solo();
        let project = repo
            .create_project(NewProject {
                ownership: Ownership::Personal(solo.user_id),
                title: "Launch".to_owned(),
            })
            .await
            .unwrap();

        let view = CreateBoardAction::new(repo)
            .execute(&solo, project.id, &request("Sprint 1"))
            .await
            .unwrap();

        assert_eq!(view.board.board_index, 1);
        let columns: Vec<&str> = view.columns.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(columns, DEFAULT_COLUMNS);
        let positions: Vec<i32> = view.statuses.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_board_limit() {
        let repo = MockProjectRepository::new();
        let solo = fixtures::solo();
        let project = repo
            .create_project(NewProject {
                ownership: Ownership::Personal(solo.user_id),
                title: "Launch".to_owned(),
            })
            .await
            .unwrap();
        let action = CreateBoardAction::new(repo);

        for n in 1..=10 {
            let view = action
                .execute(&solo, project.id, &request(&format!("Board {n}")))
                .await
                .unwrap();
            assert_eq!(view.board.board_index, n);
        }
        let eleventh = action.execute(&solo, project.id, &request("Board 11")).await;
        assert!(matches!(eleventh, Err(SwiftError::Validation(_))));
    }

    #[tokio::test]
    async fn test_team_member_cannot_add_board() {
        let repo = MockProjectRepository::new();
        let team = Uuid::new_v4();
        let project = repo
            .create_project(NewProject {
                ownership: Ownership::Team(team),
                title: "Launch".to_owned(),
            })
            .await
            .unwrap();

        let result = CreateBoardAction::new(repo)
            .execute(&fixtures::member(team), project.id, &request("Sprint 1"))
            .await;
        assert_eq!(result.unwrap_err(), SwiftError::Forbidden);

        let missing = CreateBoardAction::new(MockProjectRepository::new())
            .execute(&fixtures::owner(team), Uuid::new_v4(), &request("Sprint 1"))
            .await;
        assert_eq!(missing.unwrap_err(), SwiftError::NotFound);
    }
}
