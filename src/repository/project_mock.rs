#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::SwiftError;

use super::project::{
    Board, BoardColumn, BoardStatus, NewBoard, NewProject, Project, ProjectRepository,
};

#[derive(Clone, Default)]
pub struct MockProjectRepository {
    pub projects: Arc<Mutex<Vec<Project>>>,
    pub boards: Arc<Mutex<Vec<Board>>>,
    pub columns: Arc<Mutex<Vec<BoardColumn>>>,
    pub statuses: Arc<Mutex<Vec<BoardStatus>>>,
}

impl MockProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectRepository for MockProjectRepository {
    async fn create_project(&self, data: NewProject) -> Result<Project, SwiftError> {
        let project = Project {
            id: Uuid::new_v4(),
            ownership: data.ownership,
            title: data.title,
            created_at: Utc::now(),
        };

        let mut projects = self.projects.lock().unwrap();
        projects.push(project.clone());
        drop(projects);

        Ok(project)
    }

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, SwiftError> {
        let projects = self.projects.lock().unwrap();
        Ok(projects.iter().find(|p| p.id == id).cloned())
    }

    async fn list_projects_for(
        &self,
        user_id: Uuid,
        team_id: Option<Uuid>,
    ) -> Result<Vec<Project>, SwiftError> {
        let projects = self.projects.lock().unwrap();
        let mut visible: Vec<Project> = projects
            .iter()
            .filter(|p| {
                p.ownership.owner_id() == Some(user_id)
                    || (team_id.is_some() && p.ownership.team_id() == team_id)
            })
            .cloned()
            .collect();
        drop(projects);

        visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(visible)
    }

    async fn list_boards(&self, project_id: Uuid) -> Result<Vec<Board>, SwiftError> {
        let boards = self.boards.lock().unwrap();
        let mut found: Vec<Board> = boards
            .iter()
            .filter(|b| b.project_id == project_id)
            .cloned()
            .collect();
        drop(boards);

        found.sort_by_key(|b| b.board_index);
        Ok(found)
    }

    async fn create_board(&self, data: NewBoard) -> Result<Board, SwiftError> {
        if !self
            .projects
            .lock()
            .unwrap()
            .iter()
            .any(|p| p.id == data.project_id)
        {
            return Err(SwiftError::NotFound);
        }

        let mut boards = self.boards.lock().unwrap();
        if boards
            .iter()
            .any(|b| b.project_id == data.project_id && b.board_index == data.board_index)
        {
            return Err(SwiftError::Validation(
                "board index already used in this project".to_owned(),
            ));
        }

        let now = Utc::now();
        let board = Board {
            id: Uuid::new_v4(),
            project_id: data.project_id,
            title: data.title,
            board_index: data.board_index,
            created_at: now,
        };
        boards.push(board.clone());
        drop(boards);

        let mut columns = self.columns.lock().unwrap();
        for (position, title) in (1..).zip(data.columns) {
            columns.push(BoardColumn {
                id: Uuid::new_v4(),
                board_id: board.id,
                title,
                position,
                created_at: now,
            });
        }
        drop(columns);

        let mut statuses = self.statuses.lock().unwrap();
        for (position, title) in (1..).zip(data.statuses) {
            statuses.push(BoardStatus {
                id: Uuid::new_v4(),
                board_id: board.id,
                title,
                position,
                created_at: now,
            });
        }
        drop(statuses);

        Ok(board)
    }

    async fn list_columns(&self, board_id: Uuid) -> Result<Vec<BoardColumn>, SwiftError> {
        let columns = self.columns.lock().unwrap();
        let mut found: Vec<BoardColumn> = columns
            .iter()
            .filter(|c| c.board_id == board_id)
            .cloned()
            .collect();
        drop(columns);

        found.sort_by_key(|c| c.position);
        Ok(found)
    }

    async fn list_statuses(&self, board_id: Uuid) -> Result<Vec<BoardStatus>, SwiftError> {
        let statuses = self.statuses.lock().unwrap();
        let mut found: Vec<BoardStatus> = statuses
            .iter()
            .filter(|s| s.board_id == board_id)
            .cloned()
            .collect();
        drop(statuses);

        found.sort_by_key(|s| s.position);
        Ok(found)
    }
}
