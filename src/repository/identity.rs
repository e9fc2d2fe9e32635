use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AccountType;
use crate::SwiftError;

/// What the registration form sends along with the credentials.
///
/// The provisioner turns it into a profile once the identity exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignupMetadata {
    pub display_name: String,
    pub account_type: AccountType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    #[serde(default)]
    pub is_team_owner: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invite_code: Option<String>,
}

impl SignupMetadata {
    pub fn solo(display_name: &str) -> Self {
        Self {
            display_name: display_name.to_owned(),
            account_type: AccountType::Solo,
            team_name: None,
            is_team_owner: false,
            invite_code: None,
        }
    }

    pub fn team_owner(display_name: &str, team_name: &str) -> Self {
        Self {
            display_name: display_name.to_owned(),
            account_type: AccountType::TeamOwner,
            team_name: Some(team_name.to_owned()),
            is_team_owner: true,
            invite_code: None,
        }
    }

    pub fn invited_member(display_name: &str, invite_code: &str) -> Self {
        Self {
            display_name: display_name.to_owned(),
            account_type: AccountType::TeamMember,
            team_name: None,
            is_team_owner: false,
            invite_code: Some(invite_code.to_owned()),
        }
    }
}

/// An authentication identity. Sessions are bound to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub metadata: SignupMetadata,
    pub created_at: DateTime<Utc>,
}

impl Identity {
    pub fn is_email_verified(&self) -> bool {
        self.email_verified_at.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub email: String,
    pub hashed_password: String,
    pub metadata: SignupMetadata,
    /// Identities created from an emailed invitation link are already verified.
    pub email_verified: bool,
}

#[async_trait]
pub trait IdentityRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, SwiftError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, SwiftError>;

    /// Fails with `UserAlreadyExists` when the email is taken.
    async fn create(&self, data: NewIdentity) -> Result<Identity, SwiftError>;

    async fn mark_email_verified(&self, id: Uuid) -> Result<(), SwiftError>;
}
