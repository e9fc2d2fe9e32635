use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::repository::AccountType;

/// Events emitted by swifttasks actions and the onboarding reconciler.
///
/// Events are always fired. If no listeners are registered they are silently
/// ignored. Register listeners via
/// [`register_event_listeners`](crate::register_event_listeners) to handle them.
#[derive(Debug, Clone)]
pub enum AppEvent {
    // identity & session
    IdentityRegistered {
        user_id: Uuid,
        email: String,
        at: DateTime<Utc>,
    },
    SignedIn {
        user_id: Uuid,
        at: DateTime<Utc>,
    },
    SignInFailed {
        email: String,
        reason: String,
        at: DateTime<Utc>,
    },
    SessionRefreshed {
        user_id: Uuid,
        at: DateTime<Utc>,
    },
    SignedOut {
        user_id: Uuid,
        at: DateTime<Utc>,
    },
    EmailVerified {
        user_id: Uuid,
        at: DateTime<Utc>,
    },
    /// A verification email should be sent. Delivery is up to listeners.
    VerificationRequested {
        user_id: Uuid,
        email: String,
        at: DateTime<Utc>,
    },

    // profiles
    ProfileProvisioned {
        user_id: Uuid,
        account_type: AccountType,
        team_id: Option<Uuid>,
        at: DateTime<Utc>,
    },
    ProvisioningFailed {
        user_id: Uuid,
        reason: String,
        at: DateTime<Utc>,
    },

    // invitations
    InvitationCreated {
        team_id: Uuid,
        email: String,
        invited_by: Uuid,
        at: DateTime<Utc>,
    },
    InvitationAccepted {
        team_id: Uuid,
        user_id: Uuid,
        at: DateTime<Utc>,
    },

    // access
    AccessDenied {
        user_id: Uuid,
        resource_id: Uuid,
        reason: &'static str,
        at: DateTime<Utc>,
    },
    ResourceCreated {
        kind: &'static str,
        resource_id: Uuid,
        user_id: Uuid,
        at: DateTime<Utc>,
    },

    // onboarding
    OnboardingCompleted {
        outcome: &'static str,
        attempts: u32,
        at: DateTime<Utc>,
    },
}

impl AppEvent {
    /// Returns a dot-separated event name for logging/tracing.
    pub fn name(&self) -> &'static str {
        match self {
            Self::IdentityRegistered { .. } => "identity.registered",
            Self::SignedIn { .. } => "session.signed_in",
            Self::SignInFailed { .. } => "session.sign_in_failed",
            Self::SessionRefreshed { .. } => "session.refreshed",
            Self::SignedOut { .. } => "session.signed_out",
            Self::EmailVerified { .. } => "identity.email_verified",
            Self::VerificationRequested { .. } => "identity.verification_requested",
            Self::ProfileProvisioned { .. } => "profile.provisioned",
            Self::ProvisioningFailed { .. } => "profile.provisioning_failed",
            Self::InvitationCreated { .. } => "invitation.created",
            Self::InvitationAccepted { .. } => "invitation.accepted",
            Self::AccessDenied { .. } => "access.denied",
            Self::ResourceCreated { .. } => "resource.created",
            Self::OnboardingCompleted { .. } => "onboarding.completed",
        }
    }

    /// Returns the timestamp when this event occurred.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::IdentityRegistered { at, .. }
            | Self::SignedIn { at, .. }
            | Self::SignInFailed { at, .. }
            | Self::SessionRefreshed { at, .. }
            | Self::SignedOut { at, .. }
            | Self::EmailVerified { at, .. }
            | Self::VerificationRequested { at, .. }
            | Self::ProfileProvisioned { at, .. }
            | Self::ProvisioningFailed { at, .. }
            | Self::InvitationCreated { at, .. }
            | Self::InvitationAccepted { at, .. }
            | Self::AccessDenied { at, .. }
            | Self::ResourceCreated { at, .. }
            | Self::OnboardingCompleted { at, .. } => *at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        let now = Utc::now();
        let id = Uuid::new_v4();

        assert_eq!(
            AppEvent::IdentityRegistered {
                user_id: id,
                email: "test@example.com".to_owned(),
                at: now
            }
            .name(),
            "identity.registered"
        );

        assert_eq!(
            AppEvent::ProfileProvisioned {
                user_id: id,
                account_type: AccountType::TeamMember,
                team_id: Some(Uuid::new_v4()),
                at: now
            }
            .name(),
            "profile.provisioned"
        );

        assert_eq!(
            AppEvent::AccessDenied {
                user_id: id,
                resource_id: Uuid::new_v4(),
                reason: "forbidden",
                at: now
            }
            .name(),
            "access.denied"
        );

        assert_eq!(
            AppEvent::OnboardingCompleted {
                outcome: "dashboard",
                attempts: 3,
                at: now
            }
            .name(),
            "onboarding.completed"
        );
    }

    #[test]
    fn test_event_timestamp() {
        let now = Utc::now();
        let event = AppEvent::SignedIn {
            user_id: Uuid::new_v4(),
            at: now,
        };

        assert_eq!(event.timestamp(), now);
    }

    #[test]
    fn test_event_debug() {
        let event = AppEvent::SignInFailed {
            email: "test@example.com".to_owned(),
            reason: "invalid credentials".to_owned(),
            at: Utc::now(),
        };

        let debug_str = format!("{event:?}");
        assert!(debug_str.contains("SignInFailed"));
        assert!(debug_str.contains("invalid credentials"));
    }
}
