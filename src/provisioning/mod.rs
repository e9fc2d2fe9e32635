//! Background profile provisioning.
//!
//! Sign-up only creates the identity. The profile is materialized later by
//! a single background task fed through a channel, which is why clients
//! poll with the onboarding reconciler until it shows up.

use chrono::Utc;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::actions::ProvisionProfileAction;
use crate::events::{AppEvent, dispatch};
use crate::repository::{
    IdentityRepository, InvitationRepository, Profile, ProfileRepository, TeamRepository,
};
use crate::SwiftError;

struct Request {
    user_id: Uuid,
    reply: Option<oneshot::Sender<Result<Profile, SwiftError>>>,
}

/// Cloneable handle to the provisioning task. The task stops once every
/// handle is dropped and the queue is drained.
#[derive(Clone)]
pub struct ProvisionerHandle {
    tx: mpsc::UnboundedSender<Request>,
}

impl ProvisionerHandle {
    /// Queues an identity for provisioning. Failures are logged by the task.
    pub fn enqueue(&self, user_id: Uuid) -> Result<(), SwiftError> {
        self.tx
            .send(Request {
                user_id,
                reply: None,
            })
            .map_err(|_| SwiftError::Internal("provisioner stopped".to_owned()))
    }

    /// Queues an identity and waits for its profile.
    pub async fn provision(&self, user_id: Uuid) -> Result<Profile, SwiftError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Request {
                user_id,
                reply: Some(reply),
            })
            .map_err(|_| SwiftError::Internal("provisioner stopped".to_owned()))?;

        rx.await
            .map_err(|_| SwiftError::Internal("provisioner dropped request".to_owned()))?
    }
}

pub struct ProfileProvisioner;

impl ProfileProvisioner {
    /// Starts the task on the current tokio runtime.
    pub fn spawn<I, P, T, V>(
        identities: I,
        action: ProvisionProfileAction<P, T, V>,
    ) -> ProvisionerHandle
    where
        I: IdentityRepository + 'static,
        P: ProfileRepository + 'static,
        T: TeamRepository + 'static,
        V: InvitationRepository + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<Request>();

        tokio::spawn(async move {
            while let Some(request) = rx.recv().await {
                let result = provision_one(&identities, &action, request.user_id).await;
                if let Some(reply) = request.reply {
                    let _ = reply.send(result);
                }
            }
            log::debug!(target: "swifttasks::provisioning", "msg=\"provisioner stopped\"");
        });

        ProvisionerHandle { tx }
    }
}

async fn provision_one<I, P, T, V>(
    identities: &I,
    action: &ProvisionProfileAction<P, T, V>,
    user_id: Uuid,
) -> Result<Profile, SwiftError>
where
    I: IdentityRepository,
    P: ProfileRepository,
    T: TeamRepository,
    V: InvitationRepository,
{
    let result = match identities.find_by_id(user_id).await {
        Ok(Some(identity)) => action.execute(&identity).await,
        Ok(None) => Err(SwiftError::NotFound),
        Err(e) => Err(e),
    };

    if let Err(e) = &result {
        log::warn!(
            target: "swifttasks::provisioning",
            "msg=\"provisioning failed\", user_id={user_id}, error=\"{e}\""
        );
        dispatch(AppEvent::ProvisioningFailed {
            user_id,
            reason: e.to_string(),
            at: Utc::now(),
        })
        .await;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{
        AccountType, MockIdentityRepository, MockInvitationRepository, MockProfileRepository,
        MockTeamRepository, NewIdentity, SignupMetadata,
    };

    struct Fixture {
        identities: MockIdentityRepository,
        profiles: MockProfileRepository,
        handle: ProvisionerHandle,
    }

    fn start() -> Fixture {
        let identities = MockIdentityRepository::new();
        let profiles = MockProfileRepository::new();
        let action = ProvisionProfileAction::new(
            profiles.clone(),
            MockTeamRepository::new(),
            MockInvitationRepository::new(),
        );
        let handle = ProfileProvisioner::spawn(identities.clone(), action);
        Fixture {
            identities,
            profiles,
            handle,
        }
    }

    async fn register(fx: &Fixture, email: &str, metadata: SignupMetadata) -> Uuid {
        fx.identities
            .create(NewIdentity {
                email: email.to_owned(),
                hashed_password: String::new(),
                metadata,
                email_verified: true,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_provision_waits_for_profile() {
        let fx = start();
        let id = register(&fx, "o@x.com", SignupMetadata::team_owner("Olga", "Globex")).await;

        let profile = fx.handle.provision(id).await.unwrap();
        assert_eq!(profile.account_type, AccountType::TeamOwner);
        assert!(profile.team_id.is_some());
    }

    #[tokio::test]
    async fn test_enqueued_requests_run_in_order() {
        let fx = start();
        let first = register(&fx, "a@x.com", SignupMetadata::solo("Ann")).await;
        let second = register(&fx, "b@x.com", SignupMetadata::solo("Bob")).await;

        fx.handle.enqueue(first).unwrap();
        fx.handle.enqueue(second).unwrap();
        // a waited request is queued behind both
        fx.handle.provision(second).await.unwrap();

        let ids: Vec<Uuid> = fx.profiles.profiles.lock().unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[tokio::test]
    async fn test_unknown_identity_reports_not_found() {
        let fx = start();
        let result = fx.handle.provision(Uuid::new_v4()).await;
        assert_eq!(result.unwrap_err(), SwiftError::NotFound);
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_the_task() {
        let fx = start();
        let bad = register(&fx, "c@x.com", SignupMetadata::invited_member("Cy", "NOPE1234")).await;
        let good = register(&fx, "d@x.com", SignupMetadata::solo("Di")).await;

        assert!(matches!(
            fx.handle.provision(bad).await,
            Err(SwiftError::InvitationInvalid(_))
        ));
        assert!(fx.handle.provision(good).await.is_ok());
    }
}
