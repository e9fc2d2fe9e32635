use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::SwiftError;
use crate::validators::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Solo,
    TeamOwner,
    TeamMember,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Solo => "solo",
            Self::TeamOwner => "team_owner",
            Self::TeamMember => "team_member",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "solo" => Some(Self::Solo),
            "team_owner" => Some(Self::TeamOwner),
            "team_member" => Some(Self::TeamMember),
            _ => None,
        }
    }
}

/// Application-side view of a user. Keyed by the identity id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub account_type: AccountType,
    pub is_team_owner: bool,
    pub team_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Checks the account-type / team linkage invariants.
    ///
    /// - `team_member` and `team_owner` profiles belong to a team
    /// - `solo` profiles never do
    /// - only `team_owner` profiles carry the owner flag
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_account_shape(self.account_type, self.is_team_owner, self.team_id)
    }

    /// True for the owner of the team the profile belongs to.
    pub fn owns_team(&self) -> bool {
        self.account_type == AccountType::TeamOwner && self.is_team_owner
    }
}

/// Data needed to materialize a profile.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub account_type: AccountType,
    pub is_team_owner: bool,
    pub team_id: Option<Uuid>,
}

impl NewProfile {
    pub fn solo(id: Uuid, email: &str, display_name: &str) -> Self {
        Self {
            id,
            email: email.to_owned(),
            display_name: display_name.to_owned(),
            account_type: AccountType::Solo,
            is_team_owner: false,
            team_id: None,
        }
    }

    pub fn team_member(id: Uuid, email: &str, display_name: &str, team_id: Uuid) -> Self {
        Self {
            id,
            email: email.to_owned(),
            display_name: display_name.to_owned(),
            account_type: AccountType::TeamMember,
            is_team_owner: false,
            team_id: Some(team_id),
        }
    }

    pub fn team_owner(id: Uuid, email: &str, display_name: &str, team_id: Uuid) -> Self {
        Self {
            id,
            email: email.to_owned(),
            display_name: display_name.to_owned(),
            account_type: AccountType::TeamOwner,
            is_team_owner: true,
            team_id: Some(team_id),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_account_shape(self.account_type, self.is_team_owner, self.team_id)
    }

    pub fn into_profile(self, created_at: DateTime<Utc>) -> Profile {
        Profile {
            id: self.id,
            email: self.email,
            display_name: self.display_name,
            account_type: self.account_type,
            is_team_owner: self.is_team_owner,
            team_id: self.team_id,
            created_at,
        }
    }
}

fn check_account_shape(
    account_type: AccountType,
    is_team_owner: bool,
    team_id: Option<Uuid>,
) -> Result<(), ValidationError> {
    match (account_type, team_id) {
        (AccountType::Solo, Some(_)) => {
            return Err(ValidationError::AccountTeamMismatch(
                "solo accounts cannot belong to a team",
            ));
        }
        (AccountType::TeamMember | AccountType::TeamOwner, None) => {
            return Err(ValidationError::AccountTeamMismatch(
                "team accounts must belong to a team",
            ));
        }
        _ => {}
    }

    if is_team_owner && account_type != AccountType::TeamOwner {
        return Err(ValidationError::AccountTeamMismatch(
            "only team owners carry the owner flag",
        ));
    }

    Ok(())
}

/// The profile store.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, SwiftError>;

    /// Inserts a profile. Fails with `ProfileAlreadyExists` when one exists for the id.
    async fn create(&self, data: NewProfile) -> Result<Profile, SwiftError>;

    async fn find_by_team(&self, team_id: Uuid) -> Result<Vec<Profile>, SwiftError>;
}

#[cfg(any(test, feature = "mocks"))]
impl Profile {
    pub fn mock_solo(id: Uuid) -> Self {
        NewProfile::solo(id, "solo@example.com", "Solo User").into_profile(Utc::now())
    }

    pub fn mock_member(id: Uuid, team_id: Uuid) -> Self {
        NewProfile::team_member(id, "member@example.com", "Team Member", team_id)
            .into_profile(Utc::now())
    }

    pub fn mock_owner(id: Uuid, team_id: Uuid) -> Self {
        NewProfile::team_owner(id, "owner@example.com", "Team Owner", team_id)
            .into_profile(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_type_roundtrip_strings() {
        for kind in [AccountType::Solo, AccountType::TeamOwner, AccountType::TeamMember] {
            assert_eq!(AccountType::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(AccountType::parse("single"), None);
    }

    #[test]
    fn test_constructors_satisfy_invariants() {
        let id = Uuid::new_v4();
        let team = Uuid::new_v4();
        assert!(NewProfile::solo(id, "a@x.com", "A").validate().is_ok());
        assert!(NewProfile::team_member(id, "a@x.com", "A", team).validate().is_ok());
        assert!(NewProfile::team_owner(id, "a@x.com", "A", team).validate().is_ok());
    }

    #[test]
    fn test_member_without_team_rejected() {
        let mut profile = Profile::mock_member(Uuid::new_v4(), Uuid::new_v4());
        profile.team_id = None;
        assert!(matches!(
            profile.validate(),
            Err(ValidationError::AccountTeamMismatch(_))
        ));
    }

    #[test]
    fn test_solo_with_team_rejected() {
        let mut profile = Profile::mock_solo(Uuid::new_v4());
        profile.team_id = Some(Uuid::new_v4());
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_owner_flag_only_on_owner_accounts() {
        let mut profile = Profile::mock_member(Uuid::new_v4(), Uuid::new_v4());
        profile.is_team_owner = true;
        assert!(profile.validate().is_err());
        assert!(!profile.owns_team());

        let owner = Profile::mock_owner(Uuid::new_v4(), Uuid::new_v4());
        assert!(owner.owns_team());
    }

    #[test]
    fn test_account_type_serde_names() {
        let json = serde_json::to_string(&AccountType::TeamMember).unwrap();
        assert_eq!(json, "\"team_member\"");
    }
}
