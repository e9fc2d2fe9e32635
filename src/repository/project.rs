use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Ownership;
use crate::SwiftError;

/// Board indexes run 1..=10 within a project.
pub const BOARD_INDEX_RANGE: std::ops::RangeInclusive<i32> = 1..=10;

/// Column and status positions run 1..=100 within a board.
pub const LANE_POSITION_RANGE: std::ops::RangeInclusive<i32> = 1..=100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub ownership: Ownership,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub board_index: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardColumn {
    pub id: Uuid,
    pub board_id: Uuid,
    pub title: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardStatus {
    pub id: Uuid,
    pub board_id: Uuid,
    pub title: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub ownership: Ownership,
    pub title: String,
}

#[derive(Debug, Clone)]
pub struct NewBoard {
    pub project_id: Uuid,
    pub title: String,
    pub board_index: i32,
    /// Column titles in position order.
    pub columns: Vec<String>,
    /// Status titles in position order.
    pub statuses: Vec<String>,
}

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create_project(&self, data: NewProject) -> Result<Project, SwiftError>;

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, SwiftError>;

    async fn list_projects_for(
        &self,
        user_id: Uuid,
        team_id: Option<Uuid>,
    ) -> Result<Vec<Project>, SwiftError>;

    /// Boards ordered by `board_index`.
    async fn list_boards(&self, project_id: Uuid) -> Result<Vec<Board>, SwiftError>;

    /// Creates the board with its columns and statuses, positions starting at 1.
    async fn create_board(&self, data: NewBoard) -> Result<Board, SwiftError>;

    /// Columns ordered by `position`.
    async fn list_columns(&self, board_id: Uuid) -> Result<Vec<BoardColumn>, SwiftError>;

    /// Statuses ordered by `position`.
    async fn list_statuses(&self, board_id: Uuid) -> Result<Vec<BoardStatus>, SwiftError>;
}
