#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::SwiftError;

use super::profile::{NewProfile, Profile, ProfileRepository};

#[derive(Clone, Default)]
pub struct MockProfileRepository {
    pub profiles: Arc<Mutex<Vec<Profile>>>,
    /// When set, every call fails with this error.
    pub failure: Arc<Mutex<Option<SwiftError>>>,
}

impl MockProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profiles(profiles: Vec<Profile>) -> Self {
        Self {
            profiles: Arc::new(Mutex::new(profiles)),
            ..Self::default()
        }
    }

    pub fn fail_with(&self, error: Option<SwiftError>) {
        *self.failure.lock().unwrap() = error;
    }

    fn check_failure(&self) -> Result<(), SwiftError> {
        match self.failure.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ProfileRepository for MockProfileRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, SwiftError> {
        self.check_failure()?;
        let profiles = self.profiles.lock().unwrap();
        Ok(profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, data: NewProfile) -> Result<Profile, SwiftError> {
        self.check_failure()?;
        data.validate()?;

        let mut profiles = self.profiles.lock().unwrap();
        if profiles.iter().any(|p| p.id == data.id) {
            return Err(SwiftError::ProfileAlreadyExists);
        }
        let profile = data.into_profile(Utc::now());
        profiles.push(profile.clone());
        drop(profiles);

        Ok(profile)
    }

    async fn find_by_team(&self, team_id: Uuid) -> Result<Vec<Profile>, SwiftError> {
        self.check_failure()?;
        let profiles = self.profiles.lock().unwrap();
        Ok(profiles
            .iter()
            .filter(|p| p.team_id == Some(team_id))
            .cloned()
            .collect())
    }
}
