use chrono::Utc;
use uuid::Uuid;

use super::provision_profile::{check_invitation, complete_links, create_once, join_team};
use crate::api::CreateProfileRequest;
use crate::events::{AppEvent, dispatch};
use crate::repository::{
    IdentityRepository, InvitationRepository, NewProfile, Profile, ProfileRepository,
    TeamRepository,
};
use crate::validators::validate_display_name;
use crate::SwiftError;

/// Trusted profile creation for identities that arrived through an
/// invitation email link rather than the sign-up form.
///
/// Refusals are reported as [`SwiftError::ProfileCreationFailed`] with a
/// message meant for the invitee.
#[allow(clippy::struct_field_names)]
pub struct CreateProfileAction<I, P, T, V>
where
    I: IdentityRepository,
    P: ProfileRepository,
    T: TeamRepository,
    V: InvitationRepository,
{
    identities: I,
    profiles: P,
    teams: T,
    invitations: V,
}

impl<I, P, T, V> CreateProfileAction<I, P, T, V>
where
    I: IdentityRepository,
    P: ProfileRepository,
    T: TeamRepository,
    V: InvitationRepository,
{
    pub fn new(identities: I, profiles: P, teams: T, invitations: V) -> Self {
        Self {
            identities,
            profiles,
            teams,
            invitations,
        }
    }

    /// `session_user` is the id behind the bearer token of the request.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "create_profile", skip_all, err)
    )]
    pub async fn execute(
        &self,
        session_user: Uuid,
        request: &CreateProfileRequest,
    ) -> Result<Profile, SwiftError> {
        if session_user != request.user_id {
            return Err(SwiftError::Forbidden);
        }
        let display_name = request.display_name.trim();
        validate_display_name(display_name)
            .map_err(|e| SwiftError::ProfileCreationFailed(e.to_string()))?;

        let identity = self
            .identities
            .find_by_id(request.user_id)
            .await?
            .ok_or_else(|| refuse("User not found"))?;
        if !identity.email.eq_ignore_ascii_case(request.email.trim()) {
            return Err(refuse("Email does not match the signed-in account"));
        }

        let code = request
            .invite_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        if let Some(existing) = self.profiles.find_by_id(identity.id).await? {
            if existing.team_id != request.team_id {
                return Err(SwiftError::ProfileAlreadyExists);
            }
            complete_links(&self.teams, &self.invitations, &existing, code).await?;
            return Ok(existing);
        }

        let profile = match (code, request.team_id) {
            (Some(code), team_id) => {
                let invitation = self.invitations.find_by_code(code).await?;
                let invitation = check_invitation(invitation, &identity.email)
                    .map_err(|e| refuse(&e.user_message()))?;
                if team_id.is_some_and(|t| t != invitation.team_id) {
                    return Err(refuse("Invitation does not match the team"));
                }
                join_team(
                    &self.profiles,
                    &self.teams,
                    &self.invitations,
                    NewProfile::team_member(
                        identity.id,
                        &identity.email,
                        display_name,
                        invitation.team_id,
                    ),
                    &invitation,
                )
                .await?
            }
            (None, Some(_)) => return Err(refuse("An invitation code is required to join a team")),
            (None, None) => {
                create_once(
                    &self.profiles,
                    NewProfile::solo(identity.id, &identity.email, display_name),
                )
                .await?
            }
        };

        log::info!(
            target: "swifttasks",
            "msg=\"profile created\", user_id={}, account_type={}",
            profile.id,
            profile.account_type.as_str()
        );
        dispatch(AppEvent::ProfileProvisioned {
            user_id: profile.id,
            account_type: profile.account_type,
            team_id: profile.team_id,
            at: Utc::now(),
        })
        .await;

        Ok(profile)
    }
}

fn refuse(message: &str) -> SwiftError {
    SwiftError::ProfileCreationFailed(message.to_owned())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::repository::{
        AccountType, Identity, Invitation, MockIdentityRepository, MockInvitationRepository,
        MockProfileRepository, MockTeamRepository, SignupMetadata, Team,
    };

    struct Fixture {
        identities: MockIdentityRepository,
        profiles: MockProfileRepository,
        teams: MockTeamRepository,
        invitations: MockInvitationRepository,
        team: Team,
        user: Identity,
    }

    impl Fixture {
        async fn new() -> Self {
            let teams = MockTeamRepository::new();
            let team = teams.create("Acme").await.unwrap();
            let user = Identity {
                id: Uuid::new_v4(),
                email: "a@x.com".to_owned(),
                hashed_password: String::new(),
                email_verified_at: Some(Utc::now()),
                metadata: SignupMetadata::solo("Ann"),
                created_at: Utc::now(),
            };
            let identities = MockIdentityRepository::new();
            identities.identities.lock().unwrap().push(user.clone());

            let invitations = MockInvitationRepository::new();
            invitations.invitations.lock().unwrap().push(Invitation {
                code: "ABC123".to_owned(),
                email: "a@x.com".to_owned(),
                team_id: team.id,
                team_name: team.name.clone(),
                invited_by: Uuid::new_v4(),
                expires_at: Utc::now() + Duration::days(7),
                accepted_at: None,
                created_at: Utc::now(),
            });

            Self {
                identities,
                profiles: MockProfileRepository::new(),
                teams,
                invitations,
                team,
                user,
            }
        }

        fn action(
            &self,
        ) -> CreateProfileAction<
            MockIdentityRepository,
            MockProfileRepository,
            MockTeamRepository,
            MockInvitationRepository,
        > {
            CreateProfileAction::new(
                self.identities.clone(),
                self.profiles.clone(),
                self.teams.clone(),
                self.invitations.clone(),
            )
        }

        fn request(&self, code: Option<&str>) -> CreateProfileRequest {
            CreateProfileRequest {
                user_id: self.user.id,
                email: self.user.email.clone(),
                display_name: "Ann".to_owned(),
                team_id: Some(self.team.id),
                invite_code: code.map(str::to_owned),
            }
        }
    }

    #[tokio::test]
    async fn test_creates_member_profile_from_invitation() {
        let fx = Fixture::new().await;
        let profile = fx
            .action()
            .execute(fx.user.id, &fx.request(Some("ABC123")))
            .await
            .unwrap();

        assert_eq!(profile.account_type, AccountType::TeamMember);
        assert_eq!(profile.team_id, Some(fx.team.id));
        assert!(fx.invitations.find_by_code("ABC123").await.unwrap().unwrap().is_accepted());
    }

    #[tokio::test]
    async fn test_retry_returns_same_profile() {
        let fx = Fixture::new().await;
        let action = fx.action();
        let first = action.execute(fx.user.id, &fx.request(Some("ABC123"))).await.unwrap();
        let second = action.execute(fx.user.id, &fx.request(Some("ABC123"))).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_existing_member_profile_is_linked() {
        let fx = Fixture::new().await;
        fx.profiles
            .create(NewProfile::team_member(fx.user.id, "a@x.com", "Ann", fx.team.id))
            .await
            .unwrap();

        let profile = fx
            .action()
            .execute(fx.user.id, &fx.request(Some("ABC123")))
            .await
            .unwrap();

        assert_eq!(profile.team_id, Some(fx.team.id));
        let members = fx.teams.members(fx.team.id).await.unwrap();
        assert!(members.iter().any(|m| m.user_id == fx.user.id));
        assert!(fx.invitations.find_by_code("ABC123").await.unwrap().unwrap().is_accepted());
    }

    #[tokio::test]
    async fn test_other_team_conflicts() {
        let fx = Fixture::new().await;
        fx.profiles
            .profiles
            .lock()
            .unwrap()
            .push(Profile::mock_solo(fx.user.id));

        let result = fx.action().execute(fx.user.id, &fx.request(Some("ABC123"))).await;
        assert_eq!(result.unwrap_err(), SwiftError::ProfileAlreadyExists);
    }

    #[tokio::test]
    async fn test_used_invitation_refused_with_message() {
        let fx = Fixture::new().await;
        fx.invitations.mark_accepted("ABC123").await.unwrap();

        let result = fx.action().execute(fx.user.id, &fx.request(Some("ABC123"))).await;
        assert_eq!(
            result.unwrap_err(),
            SwiftError::ProfileCreationFailed("Invitation has already been used".to_owned())
        );
    }

    #[tokio::test]
    async fn test_team_without_code_refused() {
        let fx = Fixture::new().await;
        let result = fx.action().execute(fx.user.id, &fx.request(None)).await;
        assert!(matches!(result, Err(SwiftError::ProfileCreationFailed(_))));
    }

    #[tokio::test]
    async fn test_email_mismatch_refused() {
        let fx = Fixture::new().await;
        let mut request = fx.request(Some("ABC123"));
        request.email = "b@x.com".to_owned();

        let result = fx.action().execute(fx.user.id, &request).await;
        assert!(matches!(result, Err(SwiftError::ProfileCreationFailed(_))));
    }

    #[tokio::test]
    async fn test_other_session_user_forbidden() {
        let fx = Fixture::new().await;
        let result = fx
            .action()
            .execute(Uuid::new_v4(), &fx.request(Some("ABC123")))
            .await;
        assert_eq!(result.unwrap_err(), SwiftError::Forbidden);
    }
}
