use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::db_error;
use crate::repository::{NewSessionToken, SessionTokenRecord, SessionTokenRepository};
use crate::SwiftError;

#[derive(Clone)]
pub struct PostgresSessionTokenRepository {
    pool: PgPool,
}

impl PostgresSessionTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct TokenRecord {
    id: Uuid,
    user_id: Uuid,
    access_token_hash: String,
    refresh_token_hash: String,
    access_expires_at: DateTime<Utc>,
    refresh_expires_at: DateTime<Utc>,
    revoked_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<TokenRecord> for SessionTokenRecord {
    fn from(row: TokenRecord) -> Self {
        SessionTokenRecord {
            id: row.id,
            user_id: row.user_id,
            access_token_hash: row.access_token_hash,
            refresh_token_hash: row.refresh_token_hash,
            access_expires_at: row.access_expires_at,
            refresh_expires_at: row.refresh_expires_at,
            revoked_at: row.revoked_at,
            created_at: row.created_at,
        }
    }
}

const COLUMNS: &str = "id, user_id, access_token_hash, refresh_token_hash, access_expires_at, \
                       refresh_expires_at, revoked_at, created_at";

#[async_trait]
impl SessionTokenRepository for PostgresSessionTokenRepository {
    async fn create(&self, data: NewSessionToken) -> Result<SessionTokenRecord, SwiftError> {
        let row: TokenRecord = sqlx::query_as(&format!(
            "INSERT INTO session_tokens (id, user_id, access_token_hash, refresh_token_hash, \
             access_expires_at, refresh_expires_at) VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(&data.access_token_hash)
        .bind(&data.refresh_token_hash)
        .bind(data.access_expires_at)
        .bind(data.refresh_expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.into())
    }

    async fn find_by_access_hash(
        &self,
        access_token_hash: &str,
    ) -> Result<Option<SessionTokenRecord>, SwiftError> {
        let row: Option<TokenRecord> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM session_tokens WHERE access_token_hash = $1"
        ))
        .bind(access_token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    async fn find_by_refresh_hash(
        &self,
        refresh_token_hash: &str,
    ) -> Result<Option<SessionTokenRecord>, SwiftError> {
        let row: Option<TokenRecord> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM session_tokens WHERE refresh_token_hash = $1"
        ))
        .bind(refresh_token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    async fn revoke(&self, id: Uuid) -> Result<(), SwiftError> {
        sqlx::query(
            "UPDATE session_tokens SET revoked_at = COALESCE(revoked_at, NOW()) WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<(), SwiftError> {
        sqlx::query(
            "UPDATE session_tokens SET revoked_at = NOW() WHERE user_id = $1 AND revoked_at IS NULL",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }
}
