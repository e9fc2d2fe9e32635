use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{db_error, is_unique_violation};
use crate::repository::{Identity, IdentityRepository, NewIdentity, SignupMetadata};
use crate::SwiftError;

#[derive(Clone)]
pub struct PostgresIdentityRepository {
    pool: PgPool,
}

impl PostgresIdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct IdentityRecord {
    id: Uuid,
    email: String,
    hashed_password: String,
    email_verified_at: Option<DateTime<Utc>>,
    metadata: Json<SignupMetadata>,
    created_at: DateTime<Utc>,
}

impl From<IdentityRecord> for Identity {
    fn from(row: IdentityRecord) -> Self {
        Identity {
            id: row.id,
            email: row.email,
            hashed_password: row.hashed_password,
            email_verified_at: row.email_verified_at,
            metadata: row.metadata.0,
            created_at: row.created_at,
        }
    }
}

const COLUMNS: &str = "id, email, hashed_password, email_verified_at, metadata, created_at";

#[async_trait]
impl IdentityRepository for PostgresIdentityRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, SwiftError> {
        let row: Option<IdentityRecord> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM identities WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, SwiftError> {
        let row: Option<IdentityRecord> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM identities WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    async fn create(&self, data: NewIdentity) -> Result<Identity, SwiftError> {
        let verified_at = data.email_verified.then(Utc::now);

        let row: IdentityRecord = sqlx::query_as(&format!(
            "INSERT INTO identities (id, email, hashed_password, email_verified_at, metadata) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&data.email)
        .bind(&data.hashed_password)
        .bind(verified_at)
        .bind(Json(&data.metadata))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                SwiftError::UserAlreadyExists
            } else {
                db_error(e)
            }
        })?;

        Ok(row.into())
    }

    async fn mark_email_verified(&self, id: Uuid) -> Result<(), SwiftError> {
        let result = sqlx::query(
            "UPDATE identities SET email_verified_at = COALESCE(email_verified_at, NOW()) WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(SwiftError::NotFound);
        }

        Ok(())
    }
}
