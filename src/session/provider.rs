use async_trait::async_trait;

use super::{Session, SessionUser, SignUpOutcome};
use crate::SwiftError;
use crate::repository::SignupMetadata;

#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Resolves a live access token to its user. Expired or revoked tokens
    /// yield `None`.
    async fn get_session(&self, access_token: &str) -> Result<Option<SessionUser>, SwiftError>;

    /// Registers an identity carrying `metadata` for later provisioning.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: SignupMetadata,
    ) -> Result<SignUpOutcome, SwiftError>;

    /// Adopts a token pair received out of band (an emailed link).
    async fn set_session(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<Session, SwiftError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, SwiftError>;

    /// Rotates the pair. The old refresh token stops working.
    async fn refresh(&self, refresh_token: &str) -> Result<Session, SwiftError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), SwiftError>;
}
