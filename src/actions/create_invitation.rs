use chrono::Utc;

use crate::access::Principal;
use crate::api::InvitationCreatedResponse;
use crate::config::InvitationConfig;
use crate::crypto::generate_invite_code;
use crate::events::{AppEvent, dispatch};
use crate::repository::{InvitationRepository, NewInvitation, TeamRepository};
use crate::validators::validate_email;
use crate::SwiftError;

/// Invites an email address to the inviter's team.
///
/// Only the owner of the team may invite. The returned `invite_url` points
/// at the registration page with `invite` and `email` query parameters.
pub struct CreateInvitationAction<T, V>
where
    T: TeamRepository,
    V: InvitationRepository,
{
    teams: T,
    invitations: V,
    config: InvitationConfig,
}

impl<T: TeamRepository, V: InvitationRepository> CreateInvitationAction<T, V> {
    pub fn new(teams: T, invitations: V) -> Self {
        Self::with_config(teams, invitations, InvitationConfig::default())
    }

    pub fn with_config(teams: T, invitations: V, config: InvitationConfig) -> Self {
        Self {
            teams,
            invitations,
            config,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "create_invitation", skip_all, err)
    )]
    pub async fn execute(
        &self,
        inviter: &Principal,
        email: &str,
    ) -> Result<InvitationCreatedResponse, SwiftError> {
        let email = email.trim().to_lowercase();
        validate_email(&email)?;

        let team_id = inviter.team_id().ok_or(SwiftError::Forbidden)?;
        if !inviter.profile.owns_team() {
            return Err(SwiftError::Forbidden);
        }
        let team = self
            .teams
            .find_by_id(team_id)
            .await?
            .ok_or(SwiftError::NotFound)?;

        let invitation = self
            .invitations
            .create(NewInvitation {
                code: generate_invite_code(),
                email,
                team_id: team.id,
                team_name: team.name,
                invited_by: inviter.user_id,
                expires_at: Utc::now() + self.config.expiry,
            })
            .await?;

        log::info!(
            target: "swifttasks",
            "msg=\"invitation created\", team_id={}, email=\"{}\"",
            invitation.team_id,
            invitation.email
        );
        dispatch(AppEvent::InvitationCreated {
            team_id: invitation.team_id,
            email: invitation.email.clone(),
            invited_by: inviter.user_id,
            at: Utc::now(),
        })
        .await;

        let query = serde_urlencoded::to_string([
            ("invite", invitation.code.as_str()),
            ("email", invitation.email.as_str()),
        ])
        .map_err(|e| SwiftError::Internal(format!("encode invite url: {e}")))?;

        Ok(InvitationCreatedResponse {
            invite_url: format!("{}?{query}", self.config.register_url),
            code: invitation.code,
            email: invitation.email,
            expires_at: invitation.expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::crypto::INVITE_CODE_LENGTH;
    use crate::invitation::InviteParams;
    use crate::repository::{MockInvitationRepository, MockTeamRepository, Profile};

    fn principal(profile: Profile) -> Principal {
        Principal {
            user_id: profile.id,
            email: profile.email.clone(),
            profile,
        }
    }

    #[tokio::test]
    async fn test_owner_invites() {
        let teams = MockTeamRepository::new();
        let team = teams.create("Acme").await.unwrap();
        let invitations = MockInvitationRepository::new();
        let action = CreateInvitationAction::new(teams, invitations.clone());

        let owner = principal(Profile::mock_owner(Uuid::new_v4(), team.id));
        let created = action.execute(&owner, " A@x.com ").await.unwrap();

        assert_eq!(created.email, "a@x.com");
        assert_eq!(created.code.len(), INVITE_CODE_LENGTH);
        assert!(created.expires_at > Utc::now());

        let stored = invitations.find_by_code(&created.code).await.unwrap().unwrap();
        assert_eq!(stored.team_id, team.id);
        assert_eq!(stored.team_name, "Acme");

        let query = created.invite_url.split_once('?').unwrap().1;
        let params = InviteParams::from_query(query).unwrap();
        assert_eq!(params.code, created.code);
        assert_eq!(params.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_members_cannot_invite() {
        let teams = MockTeamRepository::new();
        let team = teams.create("Acme").await.unwrap();
        let action = CreateInvitationAction::new(teams, MockInvitationRepository::new());

        let member = principal(Profile::mock_member(Uuid::new_v4(), team.id));
        assert_eq!(
            action.execute(&member, "b@x.com").await.unwrap_err(),
            SwiftError::Forbidden
        );

        let solo = principal(Profile::mock_solo(Uuid::new_v4()));
        assert_eq!(
            action.execute(&solo, "b@x.com").await.unwrap_err(),
            SwiftError::Forbidden
        );
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let teams = MockTeamRepository::new();
        let team = teams.create("Acme").await.unwrap();
        let action = CreateInvitationAction::new(teams, MockInvitationRepository::new());

        let owner = principal(Profile::mock_owner(Uuid::new_v4(), team.id));
        assert!(matches!(
            action.execute(&owner, "not-an-email").await,
            Err(SwiftError::Validation(_))
        ));
    }
}
