use crate::SwiftError;
use crate::api::{CreateProfileRequest, InvitationDetails, InvitationValidation};
use crate::repository::SignupMetadata;
use crate::session::{Session, SessionProvider, SessionUser, SignUpOutcome};
use crate::validators::{validate_display_name, validate_invite_code, validate_team_name};

use super::api::InvitationApi;

const VALIDATION_FAILED: &str =
    "There was a problem validating your invitation. Please try again.";

/// An identity whose profile is still being provisioned.
#[derive(Debug, Clone)]
pub struct PendingIdentity {
    pub user: SessionUser,
    /// Present when no email verification is required.
    pub session: Option<Session>,
}

impl From<SignUpOutcome> for PendingIdentity {
    fn from(outcome: SignUpOutcome) -> Self {
        Self {
            user: outcome.user,
            session: outcome.session,
        }
    }
}

/// Account shape chosen on the standard registration form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationKind {
    Solo,
    Team { team_name: String },
}

pub struct InvitationResolver<A, S> {
    api: A,
    sessions: S,
}

impl<A: InvitationApi, S: SessionProvider> InvitationResolver<A, S> {
    pub fn new(api: A, sessions: S) -> Self {
        Self { api, sessions }
    }

    /// Never fails: unknown, expired and used codes as well as transport
    /// problems all come back as `valid: false` with a short message.
    pub async fn validate(&self, code: &str) -> InvitationValidation {
        let code = code.trim();
        if code.is_empty() {
            return InvitationValidation::invalid("Invitation code is required");
        }
        if validate_invite_code(code).is_err() {
            return InvitationValidation::invalid("Invalid invitation code");
        }

        match self.api.validate(code).await {
            Ok(validation) if validation.valid && validation.invite.is_none() => {
                log::warn!(
                    target: "swifttasks::invitation",
                    "msg=\"valid response without invite details\""
                );
                InvitationValidation::invalid(VALIDATION_FAILED)
            }
            Ok(validation) => validation,
            Err(err) => {
                log::warn!(
                    target: "swifttasks::invitation",
                    "msg=\"invitation validation failed\", error=\"{err}\""
                );
                InvitationValidation::invalid(VALIDATION_FAILED)
            }
        }
    }

    /// Accepts an invitation whose email link already carried a session.
    ///
    /// The refresh token is checked before anything goes over the wire.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "accept_invitation_via_token", skip_all, err)
    )]
    pub async fn accept_via_token(
        &self,
        access_token: &str,
        refresh_token: Option<&str>,
        display_name: &str,
        invite: &InvitationDetails,
    ) -> Result<Session, SwiftError> {
        let refresh_token = refresh_token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(SwiftError::InvalidToken)?;
        if access_token.trim().is_empty() {
            return Err(SwiftError::InvalidToken);
        }
        validate_display_name(display_name)?;

        let session = self
            .sessions
            .set_session(access_token, refresh_token)
            .await?;

        let request = CreateProfileRequest {
            user_id: session.user.id,
            email: session.user.email.clone(),
            display_name: display_name.trim().to_owned(),
            team_id: Some(invite.team_id),
            invite_code: Some(invite.invite_code.clone()),
        };

        self.api
            .create_profile(session.access_token.expose_secret(), &request)
            .await
            .map_err(|err| match err {
                SwiftError::ProfileCreationFailed(_) | SwiftError::Transient(_) => err,
                other => SwiftError::ProfileCreationFailed(other.user_message()),
            })?;

        log::info!(
            target: "swifttasks::invitation",
            "msg=\"invitation accepted via token\", user_id={}, team_id={}",
            session.user.id,
            invite.team_id
        );

        Ok(session)
    }

    /// Accepts an invitation through a normal sign-up. The profile is
    /// created later by the provisioner from the invite code in the
    /// sign-up metadata.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "accept_invitation_via_signup", skip_all, err)
    )]
    pub async fn accept_via_signup(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
        invite_code: &str,
    ) -> Result<PendingIdentity, SwiftError> {
        validate_invite_code(invite_code.trim())?;
        let metadata = SignupMetadata::invited_member(display_name.trim(), invite_code.trim());

        self.sign_up(email, password, metadata).await
    }

    /// Registration without an invitation.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
        kind: RegistrationKind,
    ) -> Result<PendingIdentity, SwiftError> {
        let metadata = match kind {
            RegistrationKind::Solo => SignupMetadata::solo(display_name.trim()),
            RegistrationKind::Team { team_name } => {
                validate_team_name(team_name.trim())?;
                SignupMetadata::team_owner(display_name.trim(), team_name.trim())
            }
        };

        self.sign_up(email, password, metadata).await
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: SignupMetadata,
    ) -> Result<PendingIdentity, SwiftError> {
        let outcome = self.sessions.sign_up(email, password, metadata).await?;

        if outcome.session.is_none() {
            // best effort: the account exists either way
            if let Err(err) = self.api.request_verification(email).await {
                log::warn!(
                    target: "swifttasks::invitation",
                    "msg=\"verification request failed\", user_id={}, error=\"{err}\"",
                    outcome.user.id
                );
            }
        }

        Ok(outcome.into())
    }
}
