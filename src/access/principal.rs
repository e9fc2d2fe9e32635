use crate::access::Principal;
use crate::repository::ProfileRepository;
use crate::session::SessionProvider;
use crate::SwiftError;

/// Loads a consistent `(session, profile)` pair for a request.
///
/// Fails closed: a missing session, a missing profile or any storage error
/// yields [`SwiftError::Unauthenticated`].
#[derive(Clone)]
pub struct PrincipalLoader<S, P> {
    sessions: S,
    profiles: P,
}

impl<S: SessionProvider, P: ProfileRepository> PrincipalLoader<S, P> {
    pub fn new(sessions: S, profiles: P) -> Self {
        Self { sessions, profiles }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "load_principal", skip_all, err)
    )]
    pub async fn load(&self, access_token: &str) -> Result<Principal, SwiftError> {
        let user = self
            .sessions
            .get_session(access_token)
            .await
            .map_err(|e| fail_closed("session lookup", &e))?
            .ok_or(SwiftError::Unauthenticated)?;

        let profile = self
            .profiles
            .find_by_id(user.id)
            .await
            .map_err(|e| fail_closed("profile lookup", &e))?
            .ok_or_else(|| {
                log::debug!(
                    target: "swifttasks::access",
                    "msg=\"session without profile\", user_id={}",
                    user.id
                );
                SwiftError::Unauthenticated
            })?;

        // a sign-out racing the profile read must not leave a live principal
        let still_live = self
            .sessions
            .get_session(access_token)
            .await
            .map_err(|e| fail_closed("session re-check", &e))?
            .is_some_and(|u| u.id == user.id);
        if !still_live {
            return Err(SwiftError::Unauthenticated);
        }

        Ok(Principal {
            user_id: user.id,
            email: user.email,
            profile,
        })
    }
}

fn fail_closed(stage: &str, err: &SwiftError) -> SwiftError {
    log::error!(
        target: "swifttasks::access",
        "msg=\"principal load failed\", stage=\"{stage}\", error=\"{err}\""
    );
    SwiftError::Unauthenticated
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use uuid::Uuid;

    use super::*;
    use crate::repository::{Profile, SignupMetadata};
    use crate::session::{Session, SessionUser, SignUpOutcome};
    use crate::MockProfileRepository;

    /// Answers `get_session` with a live session for the first `live_calls` calls.
    struct ScriptedSessions {
        user: SessionUser,
        live_calls: usize,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl SessionProvider for ScriptedSessions {
        async fn get_session(&self, _token: &str) -> Result<Option<SessionUser>, SwiftError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok((call < self.live_calls).then(|| self.user.clone()))
        }

        async fn sign_up(
            &self,
            _email: &str,
            _password: &str,
            _metadata: SignupMetadata,
        ) -> Result<SignUpOutcome, SwiftError> {
            Err(SwiftError::Internal("unused".to_owned()))
        }

        async fn set_session(&self, _a: &str, _r: &str) -> Result<Session, SwiftError> {
            Err(SwiftError::Internal("unused".to_owned()))
        }

        async fn sign_in(&self, _e: &str, _p: &str) -> Result<Session, SwiftError> {
            Err(SwiftError::Internal("unused".to_owned()))
        }

        async fn refresh(&self, _r: &str) -> Result<Session, SwiftError> {
            Err(SwiftError::Internal("unused".to_owned()))
        }

        async fn sign_out(&self, _a: &str) -> Result<(), SwiftError> {
            Ok(())
        }
    }

    fn sessions(user_id: Uuid, live_calls: usize) -> ScriptedSessions {
        ScriptedSessions {
            user: SessionUser {
                id: user_id,
                email: "solo@example.com".to_owned(),
            },
            live_calls,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[tokio::test]
    async fn test_loads_principal() {
        let user_id = Uuid::new_v4();
        let profiles = MockProfileRepository::with_profiles(vec![Profile::mock_solo(user_id)]);
        let loader = PrincipalLoader::new(sessions(user_id, usize::MAX), profiles);

        let principal = loader.load("token").await.unwrap();
        assert_eq!(principal.user_id, user_id);
        assert_eq!(principal.profile.id, user_id);
    }

    #[tokio::test]
    async fn test_no_session() {
        let loader = PrincipalLoader::new(sessions(Uuid::new_v4(), 0), MockProfileRepository::new());
        assert_eq!(loader.load("token").await.unwrap_err(), SwiftError::Unauthenticated);
    }

    #[tokio::test]
    async fn test_missing_profile_fails_closed() {
        let loader = PrincipalLoader::new(
            sessions(Uuid::new_v4(), usize::MAX),
            MockProfileRepository::new(),
        );
        assert_eq!(loader.load("token").await.unwrap_err(), SwiftError::Unauthenticated);
    }

    #[tokio::test]
    async fn test_profile_store_error_fails_closed() {
        let user_id = Uuid::new_v4();
        let profiles = MockProfileRepository::with_profiles(vec![Profile::mock_solo(user_id)]);
        profiles.fail_with(Some(SwiftError::DatabaseError("connection reset".to_owned())));
        let loader = PrincipalLoader::new(sessions(user_id, usize::MAX), profiles);

        assert_eq!(loader.load("token").await.unwrap_err(), SwiftError::Unauthenticated);
    }

    #[tokio::test]
    async fn test_sign_out_during_profile_read() {
        let user_id = Uuid::new_v4();
        let profiles = MockProfileRepository::with_profiles(vec![Profile::mock_solo(user_id)]);
        // live for the first read only: the re-check sees the sign-out
        let loader = PrincipalLoader::new(sessions(user_id, 1), profiles);

        assert_eq!(loader.load("token").await.unwrap_err(), SwiftError::Unauthenticated);
    }
}
