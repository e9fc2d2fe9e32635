use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{db_error, is_foreign_key_violation};
use crate::repository::{Team, TeamMember, TeamRepository};
use crate::SwiftError;

#[derive(Clone)]
pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct TeamRecord {
    id: Uuid,
    name: String,
    created_by: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl From<TeamRecord> for Team {
    fn from(row: TeamRecord) -> Self {
        Team {
            id: row.id,
            name: row.name,
            created_by: row.created_by,
            created_at: row.created_at,
        }
    }
}

#[derive(FromRow)]
struct MemberRecord {
    team_id: Uuid,
    user_id: Uuid,
    joined_at: DateTime<Utc>,
}

impl From<MemberRecord> for TeamMember {
    fn from(row: MemberRecord) -> Self {
        TeamMember {
            team_id: row.team_id,
            user_id: row.user_id,
            joined_at: row.joined_at,
        }
    }
}

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    async fn create(&self, name: &str) -> Result<Team, SwiftError> {
        let row: TeamRecord = sqlx::query_as(
            "INSERT INTO teams (id, name) VALUES ($1, $2) RETURNING id, name, created_by, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.into())
    }

    async fn create_for_owner(&self, owner_id: Uuid, name: &str) -> Result<Team, SwiftError> {
        sqlx::query(
            "INSERT INTO teams (id, name, created_by) VALUES ($1, $2, $3) \
             ON CONFLICT (created_by) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(owner_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                SwiftError::NotFound
            } else {
                db_error(e)
            }
        })?;

        let row: TeamRecord = sqlx::query_as(
            "SELECT id, name, created_by, created_at FROM teams WHERE created_by = $1",
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Team>, SwiftError> {
        let row: Option<TeamRecord> =
            sqlx::query_as("SELECT id, name, created_by, created_at FROM teams WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    async fn add_member(&self, team_id: Uuid, user_id: Uuid) -> Result<TeamMember, SwiftError> {
        sqlx::query(
            "INSERT INTO team_members (team_id, user_id) VALUES ($1, $2) \
             ON CONFLICT (team_id, user_id) DO NOTHING",
        )
        .bind(team_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                SwiftError::NotFound
            } else {
                db_error(e)
            }
        })?;

        let row: MemberRecord = sqlx::query_as(
            "SELECT team_id, user_id, joined_at FROM team_members WHERE team_id = $1 AND user_id = $2",
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.into())
    }

    async fn members(&self, team_id: Uuid) -> Result<Vec<TeamMember>, SwiftError> {
        let rows: Vec<MemberRecord> = sqlx::query_as(
            "SELECT team_id, user_id, joined_at FROM team_members WHERE team_id = $1 ORDER BY joined_at",
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
