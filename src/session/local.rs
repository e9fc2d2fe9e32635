use async_trait::async_trait;
use chrono::Utc;

use super::{Session, SessionProvider, SessionUser, SignUpOutcome};
use crate::config::SessionConfig;
use crate::crypto::{Argon2Hasher, PasswordHasher, generate_token, hash_token};
use crate::events::{AppEvent, dispatch};
use crate::repository::{
    Identity, IdentityRepository, NewIdentity, NewSessionToken, SessionTokenRecord,
    SessionTokenRepository, SignupMetadata,
};
use crate::validators::{validate_display_name, validate_email, validate_password};
use crate::{SecretString, SwiftError};

/// Issues sessions from the identity and session-token repositories.
///
/// Passwords are hashed with argon2; tokens are random strings stored as
/// SHA-256 digests.
#[derive(Clone)]
pub struct LocalSessionProvider<I, S, H = Argon2Hasher> {
    identities: I,
    tokens: S,
    hasher: H,
    config: SessionConfig,
}

impl<I: IdentityRepository, S: SessionTokenRepository> LocalSessionProvider<I, S> {
    pub fn new(identities: I, tokens: S, config: SessionConfig) -> Self {
        Self::with_hasher(identities, tokens, Argon2Hasher::default(), config)
    }
}

impl<I: IdentityRepository, S: SessionTokenRepository, H: PasswordHasher>
    LocalSessionProvider<I, S, H>
{
    pub fn with_hasher(identities: I, tokens: S, hasher: H, config: SessionConfig) -> Self {
        Self {
            identities,
            tokens,
            hasher,
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    async fn issue(&self, identity: &Identity) -> Result<Session, SwiftError> {
        let access = generate_token(self.config.token_length);
        let refresh = generate_token(self.config.token_length);
        let now = Utc::now();

        let record = self
            .tokens
            .create(NewSessionToken {
                user_id: identity.id,
                access_token_hash: hash_token(&access),
                refresh_token_hash: hash_token(&refresh),
                access_expires_at: now + self.config.access_token_expiry,
                refresh_expires_at: now + self.config.refresh_token_expiry,
            })
            .await?;

        Ok(Session {
            access_token: SecretString::new(access),
            refresh_token: SecretString::new(refresh),
            user: session_user(identity),
            expires_at: record.access_expires_at,
        })
    }

    async fn live_record(&self, access_token: &str) -> Result<Option<SessionTokenRecord>, SwiftError> {
        let record = self
            .tokens
            .find_by_access_hash(&hash_token(access_token))
            .await?;

        Ok(record.filter(|r| !r.is_revoked() && !r.access_expired()))
    }
}

async fn reject_sign_in(email: &str, reason: &str) -> Result<Session, SwiftError> {
    dispatch(AppEvent::SignInFailed {
        email: email.to_owned(),
        reason: reason.to_owned(),
        at: Utc::now(),
    })
    .await;
    log::info!(
        target: "swifttasks",
        "msg=\"sign in failed\", reason=\"{reason}\""
    );
    Err(SwiftError::InvalidCredentials)
}

fn session_user(identity: &Identity) -> SessionUser {
    SessionUser {
        id: identity.id,
        email: identity.email.clone(),
    }
}

#[async_trait]
impl<I, S, H> SessionProvider for LocalSessionProvider<I, S, H>
where
    I: IdentityRepository,
    S: SessionTokenRepository,
    H: PasswordHasher,
{
    async fn get_session(&self, access_token: &str) -> Result<Option<SessionUser>, SwiftError> {
        let Some(record) = self.live_record(access_token).await? else {
            return Ok(None);
        };

        let identity = self.identities.find_by_id(record.user_id).await?;
        Ok(identity.as_ref().map(session_user))
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "sign_up", skip_all, err)
    )]
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: SignupMetadata,
    ) -> Result<SignUpOutcome, SwiftError> {
        let email = email.trim();
        validate_email(email)?;
        validate_password(password)?;
        validate_display_name(&metadata.display_name)?;

        if self.identities.find_by_email(email).await?.is_some() {
            return Err(SwiftError::UserAlreadyExists);
        }

        let identity = self
            .identities
            .create(NewIdentity {
                email: email.to_owned(),
                hashed_password: self.hasher.hash(password)?,
                metadata,
                email_verified: !self.config.require_email_verification,
            })
            .await?;

        dispatch(AppEvent::IdentityRegistered {
            user_id: identity.id,
            email: identity.email.clone(),
            at: Utc::now(),
        })
        .await;

        log::info!(
            target: "swifttasks",
            "msg=\"identity registered\", user_id={}, verified={}",
            identity.id,
            identity.is_email_verified()
        );

        let session = if identity.is_email_verified() {
            Some(self.issue(&identity).await?)
        } else {
            None
        };

        Ok(SignUpOutcome {
            user: session_user(&identity),
            session,
        })
    }

    async fn set_session(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<Session, SwiftError> {
        if access_token.trim().is_empty() || refresh_token.trim().is_empty() {
            return Err(SwiftError::InvalidToken);
        }

        let record = self
            .tokens
            .find_by_access_hash(&hash_token(access_token))
            .await?
            .filter(|r| !r.is_revoked())
            .ok_or(SwiftError::InvalidToken)?;

        if record.refresh_token_hash != hash_token(refresh_token) {
            log::warn!(
                target: "swifttasks",
                "msg=\"token pair mismatch\", user_id={}",
                record.user_id
            );
            return Err(SwiftError::InvalidToken);
        }

        if record.access_expired() {
            return self.refresh(refresh_token).await;
        }

        let identity = self
            .identities
            .find_by_id(record.user_id)
            .await?
            .ok_or(SwiftError::InvalidToken)?;

        Ok(Session {
            access_token: SecretString::new(access_token),
            refresh_token: SecretString::new(refresh_token),
            user: session_user(&identity),
            expires_at: record.access_expires_at,
        })
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "sign_in", skip_all, err)
    )]
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, SwiftError> {
        let Some(identity) = self.identities.find_by_email(email.trim()).await? else {
            return reject_sign_in(email, "unknown email").await;
        };
        if !self.hasher.verify(password, &identity.hashed_password)? {
            return reject_sign_in(email, "wrong password").await;
        }
        if self.config.require_email_verification && !identity.is_email_verified() {
            return reject_sign_in(email, "email not verified").await;
        }

        let session = self.issue(&identity).await?;
        dispatch(AppEvent::SignedIn {
            user_id: identity.id,
            at: Utc::now(),
        })
        .await;

        Ok(session)
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "refresh_session", skip_all, err)
    )]
    async fn refresh(&self, refresh_token: &str) -> Result<Session, SwiftError> {
        let record = self
            .tokens
            .find_by_refresh_hash(&hash_token(refresh_token))
            .await?
            .filter(|r| !r.is_revoked())
            .ok_or(SwiftError::InvalidToken)?;

        self.tokens.revoke(record.id).await?;

        if record.refresh_expired() {
            return Err(SwiftError::TokenExpired);
        }

        let identity = self
            .identities
            .find_by_id(record.user_id)
            .await?
            .ok_or(SwiftError::InvalidToken)?;

        let session = self.issue(&identity).await?;

        dispatch(AppEvent::SessionRefreshed {
            user_id: identity.id,
            at: Utc::now(),
        })
        .await;

        Ok(session)
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), SwiftError> {
        let record = self
            .tokens
            .find_by_access_hash(&hash_token(access_token))
            .await?;

        if let Some(record) = record {
            self.tokens.revoke(record.id).await?;
            dispatch(AppEvent::SignedOut {
                user_id: record.user_id,
                at: Utc::now(),
            })
            .await;
            log::info!(
                target: "swifttasks",
                "msg=\"signed out\", user_id={}",
                record.user_id
            );
        }

        Ok(())
    }
}
