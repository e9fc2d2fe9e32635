#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::SwiftError;

use super::session_token::{NewSessionToken, SessionTokenRecord, SessionTokenRepository};

#[derive(Clone, Default)]
pub struct MockSessionTokenRepository {
    pub tokens: Arc<Mutex<Vec<SessionTokenRecord>>>,
}

impl MockSessionTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionTokenRepository for MockSessionTokenRepository {
    async fn create(&self, data: NewSessionToken) -> Result<SessionTokenRecord, SwiftError> {
        let record = SessionTokenRecord {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            access_token_hash: data.access_token_hash,
            refresh_token_hash: data.refresh_token_hash,
            access_expires_at: data.access_expires_at,
            refresh_expires_at: data.refresh_expires_at,
            revoked_at: None,
            created_at: Utc::now(),
        };

        let mut tokens = self.tokens.lock().unwrap();
        tokens.push(record.clone());
        drop(tokens);

        Ok(record)
    }

    async fn find_by_access_hash(
        &self,
        access_token_hash: &str,
    ) -> Result<Option<SessionTokenRecord>, SwiftError> {
        let tokens = self.tokens.lock().unwrap();
        Ok(tokens
            .iter()
            .find(|t| t.access_token_hash == access_token_hash)
            .cloned())
    }

    async fn find_by_refresh_hash(
        &self,
        refresh_token_hash: &str,
    ) -> Result<Option<SessionTokenRecord>, SwiftError> {
        let tokens = self.tokens.lock().unwrap();
        Ok(tokens
            .iter()
            .find(|t| t.refresh_token_hash == refresh_token_hash)
            .cloned())
    }

    async fn revoke(&self, id: Uuid) -> Result<(), SwiftError> {
        let mut tokens = self.tokens.lock().unwrap();
        if let Some(token) = tokens.iter_mut().find(|t| t.id == id) {
            token.revoked_at.get_or_insert_with(Utc::now);
        }
        drop(tokens);
        Ok(())
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<(), SwiftError> {
        let now = Utc::now();
        let mut tokens = self.tokens.lock().unwrap();
        for token in tokens.iter_mut().filter(|t| t.user_id == user_id) {
            token.revoked_at.get_or_insert(now);
        }
        drop(tokens);
        Ok(())
    }
}
