use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::SwiftError;

/// A stored token pair. Only SHA-256 hashes of the tokens are kept.
#[derive(Debug, Clone)]
pub struct SessionTokenRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub access_token_hash: String,
    pub refresh_token_hash: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl SessionTokenRecord {
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    pub fn access_expired(&self) -> bool {
        self.access_expires_at <= Utc::now()
    }

    pub fn refresh_expired(&self) -> bool {
        self.refresh_expires_at <= Utc::now()
    }
}

#[derive(Debug, Clone)]
pub struct NewSessionToken {
    pub user_id: Uuid,
    pub access_token_hash: String,
    pub refresh_token_hash: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
}

#[async_trait]
pub trait SessionTokenRepository: Send + Sync {
    async fn create(&self, data: NewSessionToken) -> Result<SessionTokenRecord, SwiftError>;

    async fn find_by_access_hash(
        &self,
        access_token_hash: &str,
    ) -> Result<Option<SessionTokenRecord>, SwiftError>;

    async fn find_by_refresh_hash(
        &self,
        refresh_token_hash: &str,
    ) -> Result<Option<SessionTokenRecord>, SwiftError>;

    async fn revoke(&self, id: Uuid) -> Result<(), SwiftError>;

    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<(), SwiftError>;
}
