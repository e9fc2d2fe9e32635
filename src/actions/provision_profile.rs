use chrono::Utc;
use uuid::Uuid;

use crate::events::{AppEvent, dispatch};
use crate::repository::{
    AccountType, Identity, Invitation, InvitationRepository, NewProfile, Profile,
    ProfileRepository, TeamRepository,
};
use crate::validators::{validate_display_name, validate_team_name};
use crate::SwiftError;

/// Materializes the profile of a freshly registered identity.
///
/// The shape follows the sign-up metadata:
/// 1. an invite code joins the invitation's team as `team_member`
/// 2. `team_owner` metadata creates the team and its owner profile
/// 3. anything else is a `solo` profile
///
/// Running it again for the same identity returns the existing profile and
/// finishes whatever an interrupted run left undone.
pub struct ProvisionProfileAction<P, T, V>
where
    P: ProfileRepository,
    T: TeamRepository,
    V: InvitationRepository,
{
    profiles: P,
    teams: T,
    invitations: V,
}

impl<P, T, V> ProvisionProfileAction<P, T, V>
where
    P: ProfileRepository,
    T: TeamRepository,
    V: InvitationRepository,
{
    pub fn new(profiles: P, teams: T, invitations: V) -> Self {
        Self {
            profiles,
            teams,
            invitations,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "provision_profile", skip_all, err)
    )]
    pub async fn execute(&self, identity: &Identity) -> Result<Profile, SwiftError> {
        if let Some(existing) = self.profiles.find_by_id(identity.id).await? {
            let code = identity.metadata.invite_code.as_deref();
            complete_links(&self.teams, &self.invitations, &existing, code).await?;
            return Ok(existing);
        }

        let metadata = &identity.metadata;
        let display_name = metadata.display_name.trim();
        validate_display_name(display_name)?;

        let profile = if let Some(code) = metadata.invite_code.as_deref() {
            let invitation = self.invitations.find_by_code(code.trim()).await?;
            let invitation = check_invitation(invitation, &identity.email)?;
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
        } else if metadata.account_type == AccountType::TeamOwner {
            let team_name = metadata.team_name.as_deref().unwrap_or_default().trim();
            validate_team_name(team_name)?;

            let team = self.teams.create_for_owner(identity.id, team_name).await?;
            let profile = self
                .create_once(NewProfile::team_owner(
                    identity.id,
                    &identity.email,
                    display_name,
                    team.id,
                ))
                .await?;
            complete_links(&self.teams, &self.invitations, &profile, None).await?;
            profile
        } else {
            self.create_once(NewProfile::solo(identity.id, &identity.email, display_name))
                .await?
        };

        log::info!(
            target: "swifttasks",
            "msg=\"profile provisioned\", user_id={}, account_type={}",
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

    async fn create_once(&self, data: NewProfile) -> Result<Profile, SwiftError> {
        create_once(&self.profiles, data).await
    }
}

/// Inserts a profile, treating a concurrent insert for the same id as success.
pub(crate) async fn create_once<P: ProfileRepository>(
    profiles: &P,
    data: NewProfile,
) -> Result<Profile, SwiftError> {
    let id = data.id;
    match profiles.create(data).await {
        Err(SwiftError::ProfileAlreadyExists) => profiles
            .find_by_id(id)
            .await?
            .ok_or(SwiftError::ProfileAlreadyExists),
        other => other,
    }
}

/// An invitation is usable when it exists, is unused, unexpired, and was
/// sent to `email`.
pub(crate) fn check_invitation(
    invitation: Option<Invitation>,
    email: &str,
) -> Result<Invitation, SwiftError> {
    let invitation = invitation
        .ok_or_else(|| SwiftError::InvitationInvalid("Invitation not found".to_owned()))?;

    if invitation.is_accepted() {
        return Err(SwiftError::InvitationInvalid(
            "Invitation has already been used".to_owned(),
        ));
    }
    if invitation.is_expired() {
        return Err(SwiftError::InvitationInvalid(
            "Invitation has expired".to_owned(),
        ));
    }
    if !invitation.is_for(email) {
        return Err(SwiftError::InvitationInvalid(
            "This invitation was sent to a different email address".to_owned(),
        ));
    }

    Ok(invitation)
}

/// Writes the membership row of a stored team profile and, for members,
/// consumes the invitation they joined with. Each step tolerates having
/// already run.
pub(crate) async fn complete_links<T, V>(
    teams: &T,
    invitations: &V,
    profile: &Profile,
    invite_code: Option<&str>,
) -> Result<(), SwiftError>
where
    T: TeamRepository,
    V: InvitationRepository,
{
    let Some(team_id) = profile.team_id else {
        return Ok(());
    };
    teams.add_member(team_id, profile.id).await?;

    if profile.account_type != AccountType::TeamMember {
        return Ok(());
    }
    let Some(code) = invite_code.map(str::trim).filter(|c| !c.is_empty()) else {
        return Ok(());
    };
    let Some(invitation) = invitations.find_by_code(code).await? else {
        return Ok(());
    };
    if invitation.team_id != team_id || invitation.is_accepted() {
        return Ok(());
    }

    match invitations.mark_accepted(code).await {
        // a concurrent run for the same profile got there first
        Ok(_) | Err(SwiftError::InvitationInvalid(_)) => Ok(()),
        Err(e) => Err(e),
    }
}

/// Creates a member profile, links it to the team and consumes the invitation.
pub(crate) async fn join_team<P, T, V>(
    profiles: &P,
    teams: &T,
    invitations: &V,
    data: NewProfile,
    invitation: &Invitation,
) -> Result<Profile, SwiftError>
where
    P: ProfileRepository,
    T: TeamRepository,
    V: InvitationRepository,
{
    let user_id: Uuid = data.id;
    let profile = create_once(profiles, data).await?;
    complete_links(teams, invitations, &profile, Some(&invitation.code)).await?;

    log::info!(
        target: "swifttasks",
        "msg=\"invitation accepted\", team_id={}, user_id={}",
        invitation.team_id,
        user_id
    );
    dispatch(AppEvent::InvitationAccepted {
        team_id: invitation.team_id,
        user_id,
        at: Utc::now(),
    })
    .await;

    Ok(profile)
}
