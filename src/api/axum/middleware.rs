use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::{AUTHORIZATION, COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::response::AppendHeaders;

use super::error::AppError;
use super::routes::SessionState;
use crate::access::{Principal, PrincipalLoader};
use crate::config::SessionConfig;
use crate::session::{Session, SessionProvider, SessionUser, clear_cookie, read_cookie, session_cookie};
use crate::{SecretString, SwiftError};

pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToOwned::to_owned)
}

pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|header| read_cookie(header, name))
        .map(ToOwned::to_owned)
}

/// Bearer header first, then the access cookie.
pub fn extract_access_token(headers: &HeaderMap, config: &SessionConfig) -> Option<String> {
    extract_bearer_token(headers).or_else(|| extract_cookie(headers, config.access_cookie))
}

pub(crate) fn session_cookies(
    config: &SessionConfig,
    session: &Session,
) -> AppendHeaders<[(axum::http::HeaderName, String); 2]> {
    AppendHeaders([
        (
            SET_COOKIE,
            session_cookie(
                config.access_cookie,
                session.access_token.expose_secret(),
                config.access_token_expiry.num_seconds(),
                config.secure_cookies,
            ),
        ),
        (
            SET_COOKIE,
            session_cookie(
                config.refresh_cookie,
                session.refresh_token.expose_secret(),
                config.refresh_token_expiry.num_seconds(),
                config.secure_cookies,
            ),
        ),
    ])
}

pub(crate) fn cleared_cookies(
    config: &SessionConfig,
) -> AppendHeaders<[(axum::http::HeaderName, String); 2]> {
    AppendHeaders([
        (SET_COOKIE, clear_cookie(config.access_cookie, config.secure_cookies)),
        (SET_COOKIE, clear_cookie(config.refresh_cookie, config.secure_cookies)),
    ])
}

/// The live session behind the request's access token.
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub user: SessionUser,
    pub access_token: SecretString,
}

impl<St: SessionState> FromRequestParts<St> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &St) -> Result<Self, Self::Rejection> {
        let token = extract_access_token(&parts.headers, &state.config().session)
            .ok_or(AppError(SwiftError::Unauthenticated))?;

        let user = state
            .sessions()
            .get_session(&token)
            .await?
            .ok_or(AppError(SwiftError::Unauthenticated))?;

        Ok(Self {
            user,
            access_token: SecretString::new(token),
        })
    }
}

/// The request's principal: a live session paired with its profile.
///
/// Reuses the principal the route guard already loaded when there is one.
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(pub Principal);

impl CurrentPrincipal {
    pub fn into_inner(self) -> Principal {
        self.0
    }
}

impl<St: SessionState> FromRequestParts<St> for CurrentPrincipal {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &St) -> Result<Self, Self::Rejection> {
        if let Some(principal) = parts.extensions.get::<Principal>() {
            return Ok(Self(principal.clone()));
        }

        let token = extract_access_token(&parts.headers, &state.config().session)
            .ok_or(AppError(SwiftError::Unauthenticated))?;
        let principal = PrincipalLoader::new(state.sessions().clone(), state.profiles().clone())
            .load(&token)
            .await?;

        Ok(Self(principal))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_bearer_wins_over_cookie() {
        let config = SessionConfig::default();
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("swifttasks-access-token=from-cookie"),
        );
        assert_eq!(
            extract_access_token(&headers, &config).as_deref(),
            Some("from-cookie")
        );

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        assert_eq!(
            extract_access_token(&headers, &config).as_deref(),
            Some("from-header")
        );
    }

    #[test]
    fn test_blank_bearer_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer  "));
        assert_eq!(extract_bearer_token(&headers), None);
    }
}
