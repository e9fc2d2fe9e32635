use async_trait::async_trait;
use reqwest::StatusCode;

use super::{Session, SessionProvider, SessionUser, SignUpOutcome};
use crate::SwiftError;
use crate::api::{LoginRequest, RefreshRequest, SetSessionRequest, SignUpRequest};
use crate::client::{ApiClient, read_error};
use crate::repository::SignupMetadata;

/// [`SessionProvider`] backed by the `/auth` routes of a swifttasks server.
#[derive(Debug, Clone)]
pub struct HttpSessionProvider {
    api: ApiClient,
}

impl HttpSessionProvider {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl SessionProvider for HttpSessionProvider {
    async fn get_session(&self, access_token: &str) -> Result<Option<SessionUser>, SwiftError> {
        let response = self
            .api
            .send(self.api.get("/auth/session").bearer_auth(access_token))
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => Ok(None),
            status if status.is_success() => response
                .json::<SessionUser>()
                .await
                .map(Some)
                .map_err(|e| SwiftError::Internal(format!("decode session: {e}"))),
            _ => Err(read_error(response).await),
        }
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: SignupMetadata,
    ) -> Result<SignUpOutcome, SwiftError> {
        let body = SignUpRequest {
            email: email.to_owned(),
            password: password.to_owned(),
            metadata,
        };
        self.api
            .send_json(self.api.post_json("/auth/signup", &body))
            .await
    }

    async fn set_session(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<Session, SwiftError> {
        if access_token.trim().is_empty() || refresh_token.trim().is_empty() {
            return Err(SwiftError::InvalidToken);
        }

        let body = SetSessionRequest {
            access_token: access_token.to_owned(),
            refresh_token: refresh_token.to_owned(),
        };
        self.api
            .send_json(self.api.post_json("/auth/session", &body))
            .await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, SwiftError> {
        let body = LoginRequest {
            email: email.to_owned(),
            password: password.to_owned(),
        };
        self.api
            .send_json(self.api.post_json("/auth/login", &body))
            .await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session, SwiftError> {
        let body = RefreshRequest {
            refresh_token: Some(refresh_token.to_owned()),
        };
        self.api
            .send_json(self.api.post_json("/auth/refresh", &body))
            .await
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), SwiftError> {
        let response = self
            .api
            .send(
                self.api
                    .post_json("/auth/logout", &serde_json::json!({}))
                    .bearer_auth(access_token),
            )
            .await?;

        if response.status().is_success() || response.status() == StatusCode::UNAUTHORIZED {
            Ok(())
        } else {
            Err(read_error(response).await)
        }
    }
}
