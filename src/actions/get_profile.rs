use uuid::Uuid;

use crate::repository::{Profile, ProfileRepository};
use crate::SwiftError;

/// Reads the profile of the session user. `None` means it has not been
/// provisioned yet.
pub struct GetProfileAction<P: ProfileRepository> {
    profiles: P,
}

impl<P: ProfileRepository> GetProfileAction<P> {
    pub fn new(profiles: P) -> Self {
        Self { profiles }
    }

    pub async fn execute(&self, user_id: Uuid) -> Result<Option<Profile>, SwiftError> {
        let profile = self.profiles.find_by_id(user_id).await?;
        if let Some(profile) = &profile {
            profile.validate()?;
        }
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockProfileRepository;

    #[tokio::test]
    async fn test_pending_profile_is_none() {
        let action = GetProfileAction::new(MockProfileRepository::new());
        assert_eq!(action.execute(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalid_row_is_rejected() {
        let id = Uuid::new_v4();
        let mut broken = Profile::mock_member(id, Uuid::new_v4());
        broken.team_id = None;
        let action = GetProfileAction::new(MockProfileRepository::with_profiles(vec![broken]));

        assert!(matches!(
            action.execute(id).await,
            Err(SwiftError::Validation(_))
        ));
    }
}
