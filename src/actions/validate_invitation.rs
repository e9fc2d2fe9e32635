use crate::api::{InvitationDetails, InvitationValidation};
use crate::repository::InvitationRepository;
use crate::validators::validate_invite_code;
use crate::SwiftError;

/// Resolves an invitation code. Unknown, used and expired codes are reported
/// in the returned value; only storage failures are errors.
pub struct ValidateInvitationAction<V: InvitationRepository> {
    invitations: V,
}

impl<V: InvitationRepository> ValidateInvitationAction<V> {
    pub fn new(invitations: V) -> Self {
        Self { invitations }
    }

    pub async fn execute(&self, code: &str) -> Result<InvitationValidation, SwiftError> {
        let code = code.trim();
        if code.is_empty() {
            return Ok(InvitationValidation::invalid("Invitation code is required"));
        }
        if validate_invite_code(code).is_err() {
            return Ok(InvitationValidation::invalid("Invitation not found"));
        }

        let Some(invitation) = self.invitations.find_by_code(code).await? else {
            return Ok(InvitationValidation::invalid("Invitation not found"));
        };
        if invitation.is_accepted() {
            return Ok(InvitationValidation::invalid(
                "Invitation has already been used",
            ));
        }
        if invitation.is_expired() {
            return Ok(InvitationValidation::invalid("Invitation has expired"));
        }

        Ok(InvitationValidation::valid(InvitationDetails::from(
            &invitation,
        )))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::repository::{Invitation, MockInvitationRepository};

    fn repo_with(expires_in: Duration) -> MockInvitationRepository {
        let repo = MockInvitationRepository::new();
        repo.invitations.lock().unwrap().push(Invitation {
            code: "ABC123".to_owned(),
            email: "a@x.com".to_owned(),
            team_id: Uuid::new_v4(),
            team_name: "Acme".to_owned(),
            invited_by: Uuid::new_v4(),
            expires_at: Utc::now() + expires_in,
            accepted_at: None,
            created_at: Utc::now(),
        });
        repo
    }

    #[tokio::test]
    async fn test_valid_code_returns_details() {
        let action = ValidateInvitationAction::new(repo_with(Duration::days(7)));
        let result = action.execute("ABC123").await.unwrap();

        assert!(result.valid);
        let invite = result.invite.unwrap();
        assert_eq!(invite.email, "a@x.com");
        assert_eq!(invite.team_name, "Acme");
        assert_eq!(invite.invite_code, "ABC123");
    }

    #[tokio::test]
    async fn test_unknown_and_expired_are_values() {
        let action = ValidateInvitationAction::new(repo_with(Duration::hours(-1)));

        let expired = action.execute("ABC123").await.unwrap();
        assert!(!expired.valid);
        assert_eq!(expired.error.as_deref(), Some("Invitation has expired"));

        let unknown = action.execute("ZZZ999").await.unwrap();
        assert!(!unknown.valid);
        assert!(unknown.invite.is_none());

        let empty = action.execute("  ").await.unwrap();
        assert_eq!(empty.error.as_deref(), Some("Invitation code is required"));
    }

    #[tokio::test]
    async fn test_used_code_is_invalid() {
        let repo = repo_with(Duration::days(7));
        repo.mark_accepted("ABC123").await.unwrap();
        let action = ValidateInvitationAction::new(repo);

        let used = action.execute("ABC123").await.unwrap();
        assert!(!used.valid);
        assert_eq!(used.error.as_deref(), Some("Invitation has already been used"));
    }
}
