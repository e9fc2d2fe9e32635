#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::SwiftError;

use super::identity::{Identity, IdentityRepository, NewIdentity};

#[derive(Clone, Default)]
pub struct MockIdentityRepository {
    pub identities: Arc<Mutex<Vec<Identity>>>,
}

impl MockIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityRepository for MockIdentityRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, SwiftError> {
        let identities = self.identities.lock().unwrap();
        Ok(identities.iter().find(|i| i.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, SwiftError> {
        let identities = self.identities.lock().unwrap();
        Ok(identities
            .iter()
            .find(|i| i.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create(&self, data: NewIdentity) -> Result<Identity, SwiftError> {
        let mut identities = self.identities.lock().unwrap();
        if identities
            .iter()
            .any(|i| i.email.eq_ignore_ascii_case(&data.email))
        {
            return Err(SwiftError::UserAlreadyExists);
        }

        let now = Utc::now();
        let identity = Identity {
            id: Uuid::new_v4(),
            email: data.email,
            hashed_password: data.hashed_password,
            email_verified_at: data.email_verified.then_some(now),
            metadata: data.metadata,
            created_at: now,
        };
        identities.push(identity.clone());
        drop(identities);

        Ok(identity)
    }

    async fn mark_email_verified(&self, id: Uuid) -> Result<(), SwiftError> {
        let mut identities = self.identities.lock().unwrap();
        if let Some(identity) = identities.iter_mut().find(|i| i.id == id) {
            identity.email_verified_at.get_or_insert_with(Utc::now);
            Ok(())
        } else {
            Err(SwiftError::NotFound)
        }
    }
}
