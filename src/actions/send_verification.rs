use chrono::Utc;

use crate::events::{AppEvent, dispatch};
use crate::repository::{IdentityRepository, InvitationRepository};
use crate::SwiftError;

/// What `POST /api/auth/verify-email` did for an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    AlreadyVerified,
    /// The identity signed up with a pending invitation addressed to the
    /// same email, which counts as proof of ownership.
    VerifiedByInvitation,
    /// A [`AppEvent::VerificationRequested`] was dispatched.
    Requested,
}

impl VerificationOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            Self::AlreadyVerified => "Email already verified",
            Self::VerifiedByInvitation => "Email verified",
            Self::Requested => "Verification email sent",
        }
    }
}

pub struct SendVerificationAction<I, V>
where
    I: IdentityRepository,
    V: InvitationRepository,
{
    identities: I,
    invitations: V,
}

impl<I: IdentityRepository, V: InvitationRepository> SendVerificationAction<I, V> {
    pub fn new(identities: I, invitations: V) -> Self {
        Self {
            identities,
            invitations,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "send_verification", skip_all, err)
    )]
    pub async fn execute(&self, email: &str) -> Result<VerificationOutcome, SwiftError> {
        let identity = self
            .identities
            .find_by_email(email.trim())
            .await?
            .ok_or(SwiftError::NotFound)?;

        if identity.is_email_verified() {
            return Ok(VerificationOutcome::AlreadyVerified);
        }

        if let Some(code) = identity.metadata.invite_code.as_deref() {
            let invitation = self.invitations.find_by_code(code.trim()).await?;
            let invited = invitation.is_some_and(|inv| {
                inv.is_for(&identity.email) && !inv.is_expired() && !inv.is_accepted()
            });
            if invited {
                self.identities.mark_email_verified(identity.id).await?;
                log::info!(
                    target: "swifttasks",
                    "msg=\"email verified by invitation\", user_id={}",
                    identity.id
                );
                dispatch(AppEvent::EmailVerified {
                    user_id: identity.id,
                    at: Utc::now(),
                })
                .await;
                return Ok(VerificationOutcome::VerifiedByInvitation);
            }
        }

        log::info!(
            target: "swifttasks",
            "msg=\"verification requested\", user_id={}",
            identity.id
        );
        dispatch(AppEvent::VerificationRequested {
            user_id: identity.id,
            email: identity.email,
            at: Utc::now(),
        })
        .await;

        Ok(VerificationOutcome::Requested)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use uuid::Uuid;

    use super::*;
    use crate::repository::{
        Invitation, MockIdentityRepository, MockInvitationRepository, NewIdentity, SignupMetadata,
    };

    async fn identity(repo: &MockIdentityRepository, metadata: SignupMetadata) -> Uuid {
        repo.create(NewIdentity {
            email: "a@x.com".to_owned(),
            hashed_password: String::new(),
            metadata,
            email_verified: false,
        })
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn test_plain_signup_requests_email() {
        let identities = MockIdentityRepository::new();
        identity(&identities, SignupMetadata::solo("Ann")).await;
        let action = SendVerificationAction::new(identities, MockInvitationRepository::new());

        let outcome = action.execute("a@x.com").await.unwrap();
        assert_eq!(outcome, VerificationOutcome::Requested);
        assert_eq!(outcome.message(), "Verification email sent");
    }

    #[tokio::test]
    async fn test_invited_signup_is_verified() {
        let identities = MockIdentityRepository::new();
        let id = identity(&identities, SignupMetadata::invited_member("Ann", "ABC123")).await;
        let invitations = MockInvitationRepository::new();
        invitations.invitations.lock().unwrap().push(Invitation {
            code: "ABC123".to_owned(),
            email: "a@x.com".to_owned(),
            team_id: Uuid::new_v4(),
            team_name: "Acme".to_owned(),
            invited_by: Uuid::new_v4(),
            expires_at: Utc::now() + Duration::days(1),
            accepted_at: None,
            created_at: Utc::now(),
        });
        let action = SendVerificationAction::new(identities.clone(), invitations);

        let outcome = action.execute("A@x.com").await.unwrap();
        assert_eq!(outcome, VerificationOutcome::VerifiedByInvitation);
        assert!(identities.find_by_id(id).await.unwrap().unwrap().is_email_verified());

        let again = action.execute("a@x.com").await.unwrap();
        assert_eq!(again, VerificationOutcome::AlreadyVerified);
    }

    #[tokio::test]
    async fn test_unknown_email_not_found() {
        let action = SendVerificationAction::new(
            MockIdentityRepository::new(),
            MockInvitationRepository::new(),
        );
        assert_eq!(
            action.execute("nobody@x.com").await.unwrap_err(),
            SwiftError::NotFound
        );
    }
}
