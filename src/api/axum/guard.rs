//! Route protection for page requests.
//!
//! - protected paths without a live session redirect to the login page
//! - auth entry pages with a live session redirect into the app
//! - an expired access token is refreshed from the refresh cookie

use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::http::header::SET_COOKIE;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use super::middleware::{extract_access_token, extract_cookie, session_cookies};
use super::routes::SessionState;
use crate::access::PrincipalLoader;
use crate::config::RouteConfig;
use crate::session::{Session, SessionProvider};

pub async fn route_guard<St: SessionState>(
    State(state): State<St>,
    mut request: Request,
    next: Next,
) -> Response {
    let routes = &state.config().routes;
    let path = request.uri().path().to_owned();

    let protected = routes.is_protected(&path);
    if !protected && !routes.is_auth_entry(&path) {
        return next.run(request).await;
    }

    let session_config = &state.config().session;
    let token = extract_access_token(request.headers(), session_config);
    let live = match &token {
        Some(token) => is_live(&state, token).await,
        None => false,
    };

    if !protected {
        if live {
            return Redirect::to(routes.app_entry_path).into_response();
        }
        return next.run(request).await;
    }

    if let Some(token) = token.filter(|_| live) {
        attach_principal(&state, &mut request, &token).await;
        return next.run(request).await;
    }

    let refresh_token = extract_cookie(request.headers(), session_config.refresh_cookie);
    let Some(session) = refresh_from_cookie(&state, refresh_token).await else {
        log::debug!(
            target: "swifttasks::api",
            "msg=\"protected route without session\", path=\"{path}\""
        );
        return Redirect::to(&login_redirect(routes, &path)).into_response();
    };

    attach_principal(&state, &mut request, session.access_token.expose_secret()).await;
    let mut response = next.run(request).await;

    for (_, cookie) in session_cookies(session_config, &session).0 {
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => log::error!(
                target: "swifttasks::api",
                "msg=\"invalid session cookie\", error=\"{e}\""
            ),
        }
    }
    response
}

async fn is_live<St: SessionState>(state: &St, token: &str) -> bool {
    match state.sessions().get_session(token).await {
        Ok(user) => user.is_some(),
        Err(e) => {
            log::warn!(
                target: "swifttasks::api",
                "msg=\"session lookup failed\", error=\"{e}\""
            );
            false
        }
    }
}

/// Loads the principal for downstream extractors. A session without a
/// profile still passes; the page decides what to do with it.
async fn attach_principal<St: SessionState>(state: &St, request: &mut Request, token: &str) {
    let loader = PrincipalLoader::new(state.sessions().clone(), state.profiles().clone());
    if let Ok(principal) = loader.load(token).await {
        request.extensions_mut().insert(principal);
    }
}

/// Takes the cookie value rather than the request so the future stays `Send`.
async fn refresh_from_cookie<St: SessionState>(
    state: &St,
    refresh_token: Option<String>,
) -> Option<Session> {
    let refresh_token = refresh_token?;

    match state.sessions().refresh(&refresh_token).await {
        Ok(session) => {
            log::debug!(
                target: "swifttasks::api",
                "msg=\"session refreshed by route guard\", user_id={}",
                session.user.id
            );
            Some(session)
        }
        Err(e) => {
            log::debug!(
                target: "swifttasks::api",
                "msg=\"refresh cookie rejected\", error=\"{e}\""
            );
            None
        }
    }
}

fn login_redirect(routes: &RouteConfig, path: &str) -> String {
    match serde_urlencoded::to_string([("redirectedFrom", path)]) {
        Ok(query) => format!("{}?{query}", routes.login_path),
        Err(_) => routes.login_path.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::Arc;

    use axum::Router;
    use axum::body::Body;
    use axum::http::header::{COOKIE, LOCATION};
    use axum::http::StatusCode;
    use axum::middleware::from_fn_with_state;
    use axum::routing::get;
    use chrono::{Duration, Utc};
    use tower::ServiceExt;

    use super::*;
    use crate::api::axum::DashboardState;
    use crate::config::SwiftTasksConfig;
    use crate::repository::{
        MockDocSpaceRepository, MockIdentityRepository, MockProfileRepository,
        MockProjectRepository, MockSessionTokenRepository, SignupMetadata,
    };
    use crate::session::LocalSessionProvider;

    type TestState = DashboardState<
        LocalSessionProvider<MockIdentityRepository, MockSessionTokenRepository>,
        MockProfileRepository,
        MockDocSpaceRepository,
        MockProjectRepository,
    >;

    fn guarded(state: TestState) -> Router {
        Router::new()
            .route("/dashboard", get(|| async { "ok" }))
            .layer(from_fn_with_state(state, route_guard::<TestState>))
    }

    fn state(tokens: MockSessionTokenRepository) -> TestState {
        let config = Arc::new(SwiftTasksConfig::development());
        DashboardState {
            sessions: LocalSessionProvider::new(
                MockIdentityRepository::new(),
                tokens,
                config.session.clone(),
            ),
            profiles: MockProfileRepository::new(),
            doc_spaces: MockDocSpaceRepository::new(),
            projects: MockProjectRepository::new(),
            config,
        }
    }

    #[tokio::test]
    async fn test_refresh_cookie_renews_expired_session() {
        let tokens = MockSessionTokenRepository::new();
        let state = state(tokens.clone());
        let session = state
            .sessions
            .sign_up("ann@example.com", "correct-horse-battery", SignupMetadata::solo("Ann"))
            .await
            .unwrap()
            .session
            .unwrap();
        for token in tokens.tokens.lock().unwrap().iter_mut() {
            token.access_expires_at = Utc::now() - Duration::minutes(1);
        }

        let cookies = format!(
            "swifttasks-access-token={}; swifttasks-refresh-token={}",
            session.access_token.expose_secret(),
            session.refresh_token.expose_secret()
        );
        let request = axum::http::Request::builder()
            .uri("/dashboard")
            .header(COOKIE, cookies)
            .body(Body::empty())
            .unwrap();
        let response = guarded(state).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get_all(SET_COOKIE).iter().count(), 2);
    }

    #[tokio::test]
    async fn test_missing_session_redirects_to_login() {
        let state = state(MockSessionTokenRepository::new());
        let request = axum::http::Request::builder()
            .uri("/dashboard")
            .header(COOKIE, "swifttasks-refresh-token=stale")
            .body(Body::empty())
            .unwrap();
        let response = guarded(state).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(LOCATION).unwrap(),
            "/login?redirectedFrom=%2Fdashboard"
        );
    }

    #[test]
    fn test_login_redirect_encodes_path() {
        let routes = RouteConfig::default();
        assert_eq!(
            login_redirect(&routes, "/dashboard/docs/1"),
            "/login?redirectedFrom=%2Fdashboard%2Fdocs%2F1"
        );
    }
}
