use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{db_error, is_unique_violation};
use crate::repository::{AccountType, NewProfile, Profile, ProfileRepository};
use crate::SwiftError;

#[derive(Clone)]
pub struct PostgresProfileRepository {
    pool: PgPool,
}

impl PostgresProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ProfileRecord {
    id: Uuid,
    email: String,
    display_name: String,
    account_type: String,
    is_team_owner: bool,
    team_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProfileRecord> for Profile {
    type Error = SwiftError;

    fn try_from(row: ProfileRecord) -> Result<Self, Self::Error> {
        let account_type = AccountType::parse(&row.account_type).ok_or_else(|| {
            SwiftError::DatabaseError(format!("unknown account type {:?}", row.account_type))
        })?;

        Ok(Profile {
            id: row.id,
            email: row.email,
            display_name: row.display_name,
            account_type,
            is_team_owner: row.is_team_owner,
            team_id: row.team_id,
            created_at: row.created_at,
        })
    }
}

const COLUMNS: &str = "id, email, display_name, account_type, is_team_owner, team_id, created_at";

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, SwiftError> {
        let row: Option<ProfileRecord> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM profiles WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        row.map(TryInto::try_into).transpose()
    }

    async fn create(&self, data: NewProfile) -> Result<Profile, SwiftError> {
        data.validate()?;

        let row: ProfileRecord = sqlx::query_as(&format!(
            "INSERT INTO profiles (id, email, display_name, account_type, is_team_owner, team_id) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {COLUMNS}"
        ))
        .bind(data.id)
        .bind(&data.email)
        .bind(&data.display_name)
        .bind(data.account_type.as_str())
        .bind(data.is_team_owner)
        .bind(data.team_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                SwiftError::ProfileAlreadyExists
            } else {
                db_error(e)
            }
        })?;

        row.try_into()
    }

    async fn find_by_team(&self, team_id: Uuid) -> Result<Vec<Profile>, SwiftError> {
        let rows: Vec<ProfileRecord> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM profiles WHERE team_id = $1 ORDER BY created_at"
        ))
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}
