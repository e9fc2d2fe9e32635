use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{db_error, is_foreign_key_violation, ownership};
use crate::repository::{DocPage, DocSpace, DocSpaceRepository, NewDocPage, NewDocSpace};
use crate::SwiftError;

#[derive(Clone)]
pub struct PostgresDocSpaceRepository {
    pool: PgPool,
}

impl PostgresDocSpaceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct SpaceRecord {
    id: Uuid,
    owner_id: Option<Uuid>,
    team_id: Option<Uuid>,
    name: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<SpaceRecord> for DocSpace {
    type Error = SwiftError;

    fn try_from(row: SpaceRecord) -> Result<Self, Self::Error> {
        Ok(DocSpace {
            id: row.id,
            ownership: ownership(row.owner_id, row.team_id)?,
            name: row.name,
            created_at: row.created_at,
        })
    }
}

#[derive(FromRow)]
struct PageRecord {
    id: Uuid,
    space_id: Uuid,
    title: String,
    content: String,
    page_order: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PageRecord> for DocPage {
    fn from(row: PageRecord) -> Self {
        DocPage {
            id: row.id,
            space_id: row.space_id,
            title: row.title,
            content: row.content,
            order: row.page_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SPACE_COLUMNS: &str = "id, owner_id, team_id, name, created_at";
const PAGE_COLUMNS: &str = "id, space_id, title, content, page_order, created_at, updated_at";

#[async_trait]
impl DocSpaceRepository for PostgresDocSpaceRepository {
    async fn create_space(&self, data: NewDocSpace) -> Result<DocSpace, SwiftError> {
        let row: SpaceRecord = sqlx::query_as(&format!(
            "INSERT INTO doc_spaces (id, owner_id, team_id, name) VALUES ($1, $2, $3, $4) \
             RETURNING {SPACE_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(data.ownership.owner_id())
        .bind(data.ownership.team_id())
        .bind(&data.name)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        row.try_into()
    }

    async fn find_space(&self, id: Uuid) -> Result<Option<DocSpace>, SwiftError> {
        let row: Option<SpaceRecord> = sqlx::query_as(&format!(
            "SELECT {SPACE_COLUMNS} FROM doc_spaces WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list_spaces_for(
        &self,
        user_id: Uuid,
        team_id: Option<Uuid>,
    ) -> Result<Vec<DocSpace>, SwiftError> {
        // NULL team_id matches nothing on the right-hand side
        let rows: Vec<SpaceRecord> = sqlx::query_as(&format!(
            "SELECT {SPACE_COLUMNS} FROM doc_spaces \
             WHERE owner_id = $1 OR team_id = $2 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn list_pages(&self, space_id: Uuid) -> Result<Vec<DocPage>, SwiftError> {
        let rows: Vec<PageRecord> = sqlx::query_as(&format!(
            "SELECT {PAGE_COLUMNS} FROM doc_pages WHERE space_id = $1 \
             ORDER BY page_order, created_at"
        ))
        .bind(space_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_page(&self, data: NewDocPage) -> Result<DocPage, SwiftError> {
        let row: PageRecord = sqlx::query_as(&format!(
            "INSERT INTO doc_pages (id, space_id, title, content, page_order) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {PAGE_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(data.space_id)
        .bind(&data.title)
        .bind(&data.content)
        .bind(data.order)
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

    async fn set_page_orders(
        &self,
        space_id: Uuid,
        orders: &[(Uuid, i32)],
    ) -> Result<(), SwiftError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        for (page_id, order) in orders {
            let result = sqlx::query(
                "UPDATE doc_pages SET page_order = $1, updated_at = NOW() \
                 WHERE id = $2 AND space_id = $3",
            )
            .bind(order)
            .bind(page_id)
            .bind(space_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

            if result.rows_affected() == 0 {
                // dropping the transaction rolls it back
                return Err(SwiftError::NotFound);
            }
        }

        tx.commit().await.map_err(db_error)
    }
}
