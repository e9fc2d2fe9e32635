use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{db_error, is_foreign_key_violation, is_unique_violation, ownership};
use crate::repository::{
    Board, BoardColumn, BoardStatus, NewBoard, NewProject, Project, ProjectRepository,
};
use crate::SwiftError;

#[derive(Clone)]
pub struct PostgresProjectRepository {
    pool: PgPool,
}

impl PostgresProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ProjectRecord {
    id: Uuid,
    owner_id: Option<Uuid>,
    team_id: Option<Uuid>,
    title: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProjectRecord> for Project {
    type Error = SwiftError;

    fn try_from(row: ProjectRecord) -> Result<Self, Self::Error> {
        Ok(Project {
            id: row.id,
            ownership: ownership(row.owner_id, row.team_id)?,
            title: row.title,
            created_at: row.created_at,
        })
    }
}

#[derive(FromRow)]
struct BoardRecord {
    id: Uuid,
    project_id: Uuid,
    title: String,
    board_index: i32,
    created_at: DateTime<Utc>,
}

impl From<BoardRecord> for Board {
    fn from(row: BoardRecord) -> Self {
        Board {
            id: row.id,
            project_id: row.project_id,
            title: row.title,
            board_index: row.board_index,
            created_at: row.created_at,
        }
    }
}

/// Shared shape of `board_columns` and `board_statuses` rows.
#[derive(FromRow)]
struct LaneRecord {
    id: Uuid,
    board_id: Uuid,
    title: String,
    position: i32,
    created_at: DateTime<Utc>,
}

impl From<LaneRecord> for BoardColumn {
    fn from(row: LaneRecord) -> Self {
        BoardColumn {
            id: row.id,
            board_id: row.board_id,
            title: row.title,
            position: row.position,
            created_at: row.created_at,
        }
    }
}

impl From<LaneRecord> for BoardStatus {
    fn from(row: LaneRecord) -> Self {
        BoardStatus {
            id: row.id,
            board_id: row.board_id,
            title: row.title,
            position: row.position,
            created_at: row.created_at,
        }
    }
}

const PROJECT_COLUMNS: &str = "id, owner_id, team_id, title, created_at";
const BOARD_COLUMNS: &str = "id, project_id, title, board_index, created_at";
const LANE_COLUMNS: &str = "id, board_id, title, position, created_at";

impl PostgresProjectRepository {
    async fn lanes(&self, table: &str, board_id: Uuid) -> Result<Vec<LaneRecord>, SwiftError> {
        sqlx::query_as(&format!(
            "SELECT {LANE_COLUMNS} FROM {table} WHERE board_id = $1 ORDER BY position"
        ))
        .bind(board_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn create_project(&self, data: NewProject) -> Result<Project, SwiftError> {
        let row: ProjectRecord = sqlx::query_as(&format!(
            "INSERT INTO projects (id, owner_id, team_id, title) VALUES ($1, $2, $3, $4) \
             RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(data.ownership.owner_id())
        .bind(data.ownership.team_id())
        .bind(&data.title)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        row.try_into()
    }

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, SwiftError> {
        let row: Option<ProjectRecord> = sqlx::query_as(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list_projects_for(
        &self,
        user_id: Uuid,
        team_id: Option<Uuid>,
    ) -> Result<Vec<Project>, SwiftError> {
        let rows: Vec<ProjectRecord> = sqlx::query_as(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects \
             WHERE owner_id = $1 OR team_id = $2 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn list_boards(&self, project_id: Uuid) -> Result<Vec<Board>, SwiftError> {
        let rows: Vec<BoardRecord> = sqlx::query_as(&format!(
            "SELECT {BOARD_COLUMNS} FROM boards WHERE project_id = $1 ORDER BY board_index"
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_board(&self, data: NewBoard) -> Result<Board, SwiftError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let row: BoardRecord = sqlx::query_as(&format!(
            "INSERT INTO boards (id, project_id, title, board_index) VALUES ($1, $2, $3, $4) \
             RETURNING {BOARD_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(data.project_id)
        .bind(&data.title)
        .bind(data.board_index)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                SwiftError::NotFound
            } else if is_unique_violation(&e) {
                SwiftError::Validation("board index already used in this project".to_owned())
            } else {
                db_error(e)
            }
        })?;

        for (table, titles) in [
            ("board_columns", &data.columns),
            ("board_statuses", &data.statuses),
        ] {
            for (position, title) in (1..).zip(titles) {
                sqlx::query(&format!(
                    "INSERT INTO {table} (id, board_id, title, position) VALUES ($1, $2, $3, $4)"
                ))
                .bind(Uuid::new_v4())
                .bind(row.id)
                .bind(title)
                .bind(position)
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
            }
        }

        tx.commit().await.map_err(db_error)?;
        Ok(row.into())
    }

    async fn list_columns(&self, board_id: Uuid) -> Result<Vec<BoardColumn>, SwiftError> {
        let rows = self.lanes("board_columns", board_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_statuses(&self, board_id: Uuid) -> Result<Vec<BoardStatus>, SwiftError> {
        let rows = self.lanes("board_statuses", board_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
