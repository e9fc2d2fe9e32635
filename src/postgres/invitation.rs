use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{db_error, is_foreign_key_violation};
use crate::repository::{Invitation, InvitationRepository, NewInvitation};
use crate::SwiftError;

#[derive(Clone)]
pub struct PostgresInvitationRepository {
    pool: PgPool,
}

impl PostgresInvitationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct InvitationRecord {
    code: String,
    email: String,
    team_id: Uuid,
    team_name: String,
    invited_by: Uuid,
    expires_at: DateTime<Utc>,
    accepted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<InvitationRecord> for Invitation {
    fn from(row: InvitationRecord) -> Self {
        Invitation {
            code: row.code,
            email: row.email,
            team_id: row.team_id,
            team_name: row.team_name,
            invited_by: row.invited_by,
            expires_at: row.expires_at,
            accepted_at: row.accepted_at,
            created_at: row.created_at,
        }
    }
}

const COLUMNS: &str =
    "code, email, team_id, team_name, invited_by, expires_at, accepted_at, created_at";

#[async_trait]
impl InvitationRepository for PostgresInvitationRepository {
    async fn create(&self, data: NewInvitation) -> Result<Invitation, SwiftError> {
        let row: InvitationRecord = sqlx::query_as(&format!(
            "INSERT INTO team_invitations (code, email, team_id, team_name, invited_by, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {COLUMNS}"
        ))
        .bind(&data.code)
        .bind(&data.email)
        .bind(data.team_id)
        .bind(&data.team_name)
        .bind(data.invited_by)
        .bind(data.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                SwiftError::NotFound
            } else {
                db_error(e)
            }
        })?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Invitation>, SwiftError> {
        let row: Option<InvitationRecord> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM team_invitations WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    async fn mark_accepted(&self, code: &str) -> Result<Invitation, SwiftError> {
        let row: Option<InvitationRecord> = sqlx::query_as(&format!(
            "UPDATE team_invitations SET accepted_at = NOW() \
             WHERE code = $1 AND accepted_at IS NULL RETURNING {COLUMNS}"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        if let Some(row) = row {
            return Ok(row.into());
        }

        // either unknown or already used
        match self.find_by_code(code).await? {
            Some(_) => Err(SwiftError::InvitationInvalid(
                "invitation already used".to_owned(),
            )),
            None => Err(SwiftError::NotFound),
        }
    }

    async fn find_pending_by_team(&self, team_id: Uuid) -> Result<Vec<Invitation>, SwiftError> {
        let rows: Vec<InvitationRecord> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM team_invitations \
             WHERE team_id = $1 AND accepted_at IS NULL AND expires_at > NOW() \
             ORDER BY created_at"
        ))
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
