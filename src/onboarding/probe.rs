use async_trait::async_trait;
use uuid::Uuid;

use crate::SwiftError;
use crate::repository::{Profile, ProfileRepository};

#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Found(Profile),
    /// The identity exists but its profile is not visible yet.
    Pending,
    /// Nobody is signed in.
    NoIdentity,
}

/// One read-only look at the profile store.
///
/// Called repeatedly by the reconciler, so implementations must not have
/// side effects.
#[async_trait]
pub trait ProfileProbe: Send + Sync {
    async fn check(&self) -> Result<ProbeOutcome, SwiftError>;
}

/// Probes a [`ProfileRepository`] directly for a known identity.
#[derive(Debug, Clone)]
pub struct StoreProbe<R> {
    profiles: R,
    user_id: Uuid,
}

impl<R: ProfileRepository> StoreProbe<R> {
    pub fn new(profiles: R, user_id: Uuid) -> Self {
        Self { profiles, user_id }
    }
}

#[async_trait]
impl<R: ProfileRepository> ProfileProbe for StoreProbe<R> {
    async fn check(&self) -> Result<ProbeOutcome, SwiftError> {
        let profile = self.profiles.find_by_id(self.user_id).await?;
        Ok(profile.map_or(ProbeOutcome::Pending, ProbeOutcome::Found))
    }
}

#[cfg(feature = "client")]
pub use http::HttpProfileProbe;

#[cfg(feature = "client")]
mod http {
    use async_trait::async_trait;
    use reqwest::StatusCode;

    use super::{ProbeOutcome, ProfileProbe};
    use crate::client::{ApiClient, read_error};
    use crate::repository::Profile;
    use crate::{SecretString, SwiftError};

    /// Polls `GET /api/profile` with the pending session's access token.
    #[derive(Debug, Clone)]
    pub struct HttpProfileProbe {
        api: ApiClient,
        access_token: SecretString,
    }

    impl HttpProfileProbe {
        pub fn new(api: ApiClient, access_token: SecretString) -> Self {
            Self { api, access_token }
        }
    }

    #[async_trait]
    impl ProfileProbe for HttpProfileProbe {
        async fn check(&self) -> Result<ProbeOutcome, SwiftError> {
            let request = self
                .api
                .get("/api/profile")
                .bearer_auth(self.access_token.expose_secret());
            let response = self.api.send(request).await?;

            match response.status() {
                StatusCode::OK => response
                    .json::<Profile>()
                    .await
                    .map(ProbeOutcome::Found)
                    .map_err(|e| SwiftError::Transient(format!("decode profile: {e}"))),
                StatusCode::NOT_FOUND => Ok(ProbeOutcome::Pending),
                StatusCode::UNAUTHORIZED => Ok(ProbeOutcome::NoIdentity),
                _ => Err(read_error(response).await),
            }
        }
    }
}
