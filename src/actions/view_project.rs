use uuid::Uuid;

use super::guard;
use crate::access::Principal;
use crate::api::{BoardView, ProjectView};
use crate::repository::{Board, ProjectRepository};
use crate::SwiftError;

/// Loads a project with its boards, columns and statuses after the access check.
pub struct ViewProjectAction<R: ProjectRepository> {
    projects: R,
}

impl<R: ProjectRepository> ViewProjectAction<R> {
    pub fn new(projects: R) -> Self {
        Self { projects }
    }

    pub async fn execute(
        &self,
        principal: &Principal,
        project_id: Uuid,
    ) -> Result<ProjectView, SwiftError> {
        let project = self.projects.find_project(project_id).await?;
        let grant = guard(principal, project_id, project.as_ref(), false).await?;
        let project = project.ok_or(SwiftError::NotFound)?;

        let mut boards = Vec::new();
        for board in self.projects.list_boards(project.id).await? {
            boards.push(board_view(&self.projects, board).await?);
        }

        Ok(ProjectView {
            project,
            boards,
            can_manage: grant.can_manage,
        })
    }
}

pub(crate) async fn board_view<R: ProjectRepository>(
    projects: &R,
    board: Board,
) -> Result<BoardView, SwiftError> {
    let columns = projects.list_columns(board.id).await?;
    let statuses = projects.list_statuses(board.id).await?;
    Ok(BoardView {
        board,
        columns,
        statuses,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::fixtures;
    use crate::repository::{MockProjectRepository, NewBoard, NewProject, Ownership};

    #[tokio::test]
    async fn test_boards_with_lanes_in_order() {
        let repo = MockProjectRepository::new();
        let team = Uuid::new_v4();
        let project = repo
            .create_project(NewProject {
                ownership: Ownership::Team(team),
                title: "Launch".to_owned(),
            })
            .await
            .unwrap();
        for index in [2, 1] {
            repo.create_board(NewBoard {
                project_id: project.id,
                title: format!("Board {index}"),
                board_index: index,
                columns: vec!["To Do".to_owned(), "Done".to_owned()],
                statuses: vec!["Open".to_owned()],
            })
            .await
            .unwrap();
        }

        let view = ViewProjectAction::new(repo)
            .execute(&fixtures::member(team), project.id)
            .await
            .unwrap();

        assert!(!view.can_manage);
        let indexes: Vec<i32> = view.boards.iter().map(|b| b.board.board_index).collect();
        assert_eq!(indexes, vec![1, 2]);
        let columns: Vec<&str> = view.boards[0]
            .columns
            .iter()
            .map(|c| c.title.as_str())
            .collect();
        assert_eq!(columns, vec!["To Do", "Done"]);
    }

    #[tokio::test]
    async fn test_personal_project_hidden_from_team() {
        let repo = MockProjectRepository::new();
        let team = Uuid::new_v4();
        let project = repo
            .create_project(NewProject {
                ownership: Ownership::Personal(Uuid::new_v4()),
                title: "Private".to_owned(),
            })
            .await
            .unwrap();

        let result = ViewProjectAction::new(repo)
            .execute(&fixtures::owner(team), project.id)
            .await;
        assert_eq!(result.unwrap_err(), SwiftError::Forbidden);
    }
}
