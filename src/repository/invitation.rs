use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::SwiftError;

/// A single-use, time-bounded invitation to join a team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invitation {
    pub code: String,
    pub email: String,
    pub team_id: Uuid,
    pub team_name: String,
    pub invited_by: Uuid,
    pub expires_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Invitation {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    pub fn is_accepted(&self) -> bool {
        self.accepted_at.is_some()
    }

    /// Emails are compared case-insensitively.
    pub fn is_for(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }
}

#[derive(Debug, Clone)]
pub struct NewInvitation {
    pub code: String,
    pub email: String,
    pub team_id: Uuid,
    pub team_name: String,
    pub invited_by: Uuid,
    pub expires_at: DateTime<Utc>,
}

#[async_trait]
pub trait InvitationRepository: Send + Sync {
    async fn create(&self, data: NewInvitation) -> Result<Invitation, SwiftError>;

    async fn find_by_code(&self, code: &str) -> Result<Option<Invitation>, SwiftError>;

    /// Marks the invitation used. Fails with `InvitationInvalid` if it already was.
    async fn mark_accepted(&self, code: &str) -> Result<Invitation, SwiftError>;

    async fn find_pending_by_team(&self, team_id: Uuid) -> Result<Vec<Invitation>, SwiftError>;
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn invitation(expires_in: Duration) -> Invitation {
        Invitation {
            code: "ABC123".to_owned(),
            email: "a@x.com".to_owned(),
            team_id: Uuid::new_v4(),
            team_name: "Acme".to_owned(),
            invited_by: Uuid::new_v4(),
            expires_at: Utc::now() + expires_in,
            accepted_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_expiry() {
        assert!(invitation(Duration::hours(-1)).is_expired());
        assert!(!invitation(Duration::hours(1)).is_expired());
    }

    #[test]
    fn test_email_match_ignores_case() {
        let invite = invitation(Duration::hours(1));
        assert!(invite.is_for("A@X.com"));
        assert!(!invite.is_for("b@x.com"));
    }
}
