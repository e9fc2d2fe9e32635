//! Thin `reqwest` wrapper shared by the HTTP session provider, the
//! invitation API client and the onboarding profile probe.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::SwiftError;
use crate::api::ErrorResponse;

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { client, base_url }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    pub fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> RequestBuilder {
        self.client.post(self.url(path)).json(body)
    }

    /// Sends the request and decodes a 2xx JSON body; other statuses become
    /// the matching [`SwiftError`].
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, SwiftError> {
        let response = self.send(request).await?;
        if !response.status().is_success() {
            return Err(read_error(response).await);
        }
        response
            .json::<T>()
            .await
            .map_err(|e| SwiftError::Internal(format!("decode response: {e}")))
    }

    /// Sends the request. Only transport failures are errors here.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, SwiftError> {
        request.send().await.map_err(|e| {
            log::warn!(target: "swifttasks::client", "msg=\"request failed\", error=\"{e}\"");
            SwiftError::Transient(e.to_string())
        })
    }
}

/// Converts a non-2xx response into an error, using the body when it is an
/// [`ErrorResponse`].
pub async fn read_error(response: Response) -> SwiftError {
    let status = response.status();
    let body = response.json::<ErrorResponse>().await.ok();
    error_from_status(status, body)
}

pub(crate) fn error_from_status(status: StatusCode, body: Option<ErrorResponse>) -> SwiftError {
    let (message, code) = body
        .map(|b| (b.message, b.code))
        .unwrap_or_else(|| (status.to_string(), String::new()));

    match (status.as_u16(), code.as_str()) {
        (_, "INVALID_TOKEN") => SwiftError::InvalidToken,
        (_, "TOKEN_EXPIRED") => SwiftError::TokenExpired,
        (_, "INVALID_CREDENTIALS") => SwiftError::InvalidCredentials,
        (_, "USER_ALREADY_EXISTS") => SwiftError::UserAlreadyExists,
        (_, "PROFILE_ALREADY_EXISTS") => SwiftError::ProfileAlreadyExists,
        (_, "PROFILE_CREATION_FAILED") => SwiftError::ProfileCreationFailed(message),
        (_, "INVITATION_INVALID") => SwiftError::InvitationInvalid(message),
        (401, _) => SwiftError::Unauthenticated,
        (403, _) => SwiftError::Forbidden,
        (404, _) => SwiftError::NotFound,
        (400..=499, _) => SwiftError::Validation(message),
        (502..=504, _) => SwiftError::Transient(message),
        _ => SwiftError::Internal(message),
    }
}
