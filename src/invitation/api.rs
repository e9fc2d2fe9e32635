use async_trait::async_trait;

use crate::SwiftError;
use crate::api::{CreateProfileRequest, InvitationValidation};
use crate::repository::Profile;

/// The server endpoints the invitation resolver talks to.
#[async_trait]
pub trait InvitationApi: Send + Sync {
    /// `GET /api/team-invite/validate?code=`
    async fn validate(&self, code: &str) -> Result<InvitationValidation, SwiftError>;

    /// `POST /api/auth/create-profile`. A refusal is reported as
    /// [`SwiftError::ProfileCreationFailed`] carrying the server's message.
    async fn create_profile(
        &self,
        access_token: &str,
        request: &CreateProfileRequest,
    ) -> Result<Profile, SwiftError>;

    /// `POST /api/auth/verify-email`
    async fn request_verification(&self, email: &str) -> Result<(), SwiftError>;
}

#[cfg(feature = "client")]
pub use http::HttpInvitationApi;

#[cfg(feature = "client")]
mod http {
    use async_trait::async_trait;

    use super::InvitationApi;
    use crate::SwiftError;
    use crate::api::{
        CreateProfileRequest, ErrorResponse, InvitationValidation, MessageResponse,
        VerifyEmailRequest,
    };
    use crate::client::{ApiClient, read_error};
    use crate::repository::Profile;

    #[derive(Debug, Clone)]
    pub struct HttpInvitationApi {
        api: ApiClient,
    }

    impl HttpInvitationApi {
        pub fn new(api: ApiClient) -> Self {
            Self { api }
        }
    }

    #[async_trait]
    impl InvitationApi for HttpInvitationApi {
        async fn validate(&self, code: &str) -> Result<InvitationValidation, SwiftError> {
            let request = self
                .api
                .get("/api/team-invite/validate")
                .query(&[("code", code)]);
            let response = self.api.send(request).await?;

            // invalid codes come back as `{valid: false}` with a 4xx status
            response
                .json::<InvitationValidation>()
                .await
                .map_err(|e| SwiftError::Transient(format!("decode validation: {e}")))
        }

        async fn create_profile(
            &self,
            access_token: &str,
            request: &CreateProfileRequest,
        ) -> Result<Profile, SwiftError> {
            let response = self
                .api
                .send(
                    self.api
                        .post_json("/api/auth/create-profile", request)
                        .bearer_auth(access_token),
                )
                .await?;

            if !response.status().is_success() {
                let message = response
                    .json::<ErrorResponse>()
                    .await
                    .map(|body| body.message)
                    .unwrap_or_default();
                return Err(SwiftError::ProfileCreationFailed(message));
            }

            response
                .json::<Profile>()
                .await
                .map_err(|e| SwiftError::Internal(format!("decode profile: {e}")))
        }

        async fn request_verification(&self, email: &str) -> Result<(), SwiftError> {
            let body = VerifyEmailRequest {
                email: email.to_owned(),
            };
            let response = self
                .api
                .send(self.api.post_json("/api/auth/verify-email", &body))
                .await?;

            if !response.status().is_success() {
                return Err(read_error(response).await);
            }
            let _ = response.json::<MessageResponse>().await;
            Ok(())
        }
    }
}
