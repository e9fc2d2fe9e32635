//! HTTP handlers for the session, profile and invitation endpoints.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use super::error::AppError;
use super::middleware::{
    CurrentPrincipal, CurrentSession, cleared_cookies, extract_access_token, extract_cookie,
    session_cookies,
};
use super::routes::AuthState;
use crate::actions::{
    CreateInvitationAction, CreateProfileAction, GetProfileAction, SendVerificationAction,
    ValidateInvitationAction,
};
use crate::api::{
    CreateInvitationRequest, CreateProfileRequest, LoginRequest, MessageResponse,
    RefreshRequest, SetSessionRequest, SignUpRequest, ValidateInvitationRequest,
    VerifyEmailRequest,
};
use crate::repository::{
    IdentityRepository, InvitationRepository, ProfileRepository, TeamRepository,
};
use crate::session::{Session, SessionProvider};
use crate::SwiftError;

fn with_cookies<Sp, I, P, T, V>(state: &AuthState<Sp, I, P, T, V>, session: Session) -> Response {
    (session_cookies(&state.config.session, &session), Json(session)).into_response()
}

/// Register an identity. Its profile is provisioned in the background.
///
/// POST /auth/signup
pub async fn sign_up<Sp, I, P, T, V>(
    State(state): State<AuthState<Sp, I, P, T, V>>,
    Json(body): Json<SignUpRequest>,
) -> Result<Response, AppError>
where
    Sp: SessionProvider + Clone + 'static,
    I: IdentityRepository + Clone + 'static,
    P: ProfileRepository + Clone + 'static,
    T: TeamRepository + Clone + 'static,
    V: InvitationRepository + Clone + 'static,
{
    let outcome = state
        .sessions
        .sign_up(&body.email, &body.password, body.metadata)
        .await?;

    if let Err(e) = state.provisioner.enqueue(outcome.user.id) {
        log::error!(
            target: "swifttasks::api",
            "msg=\"could not queue provisioning\", user_id={}, error=\"{e}\"",
            outcome.user.id
        );
    }

    let cookies = outcome
        .session
        .as_ref()
        .map(|session| session_cookies(&state.config.session, session));

    let response = match cookies {
        Some(cookies) => (StatusCode::CREATED, cookies, Json(outcome)).into_response(),
        None => (StatusCode::CREATED, Json(outcome)).into_response(),
    };
    Ok(response)
}

/// POST /auth/login
pub async fn sign_in<Sp, I, P, T, V>(
    State(state): State<AuthState<Sp, I, P, T, V>>,
    Json(body): Json<LoginRequest>,
) -> Result<Response, AppError>
where
    Sp: SessionProvider + Clone + 'static,
    I: IdentityRepository + Clone + 'static,
    P: ProfileRepository + Clone + 'static,
    T: TeamRepository + Clone + 'static,
    V: InvitationRepository + Clone + 'static,
{
    let session = state.sessions.sign_in(&body.email, &body.password).await?;
    Ok(with_cookies(&state, session))
}

/// The user behind the request's access token. 401 without a live session.
///
/// GET /auth/session
pub async fn get_session<Sp, I, P, T, V>(
    State(state): State<AuthState<Sp, I, P, T, V>>,
    headers: HeaderMap,
) -> Result<Response, AppError>
where
    Sp: SessionProvider + Clone + 'static,
    I: IdentityRepository + Clone + 'static,
    P: ProfileRepository + Clone + 'static,
    T: TeamRepository + Clone + 'static,
    V: InvitationRepository + Clone + 'static,
{
    let user = match extract_access_token(&headers, &state.config.session) {
        Some(token) => state.sessions.get_session(&token).await?,
        None => None,
    }
    .ok_or(SwiftError::Unauthenticated)?;
    Ok(Json(user).into_response())
}

/// Adopt a token pair delivered out of band.
///
/// POST /auth/session
pub async fn set_session<Sp, I, P, T, V>(
    State(state): State<AuthState<Sp, I, P, T, V>>,
    Json(body): Json<SetSessionRequest>,
) -> Result<Response, AppError>
where
    Sp: SessionProvider + Clone + 'static,
    I: IdentityRepository + Clone + 'static,
    P: ProfileRepository + Clone + 'static,
    T: TeamRepository + Clone + 'static,
    V: InvitationRepository + Clone + 'static,
{
    let session = state
        .sessions
        .set_session(&body.access_token, &body.refresh_token)
        .await?;
    Ok(with_cookies(&state, session))
}

/// Rotate the token pair. The refresh token comes from the body or the
/// refresh cookie.
///
/// POST /auth/refresh
pub async fn refresh<Sp, I, P, T, V>(
    State(state): State<AuthState<Sp, I, P, T, V>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError>
where
    Sp: SessionProvider + Clone + 'static,
    I: IdentityRepository + Clone + 'static,
    P: ProfileRepository + Clone + 'static,
    T: TeamRepository + Clone + 'static,
    V: InvitationRepository + Clone + 'static,
{
    let request: RefreshRequest = if body.is_empty() {
        RefreshRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| SwiftError::Validation(format!("invalid request body: {e}")))?
    };

    let token = request
        .refresh_token
        .filter(|t| !t.trim().is_empty())
        .or_else(|| extract_cookie(&headers, state.config.session.refresh_cookie))
        .ok_or(SwiftError::InvalidToken)?;

    let session = state.sessions.refresh(&token).await?;
    Ok(with_cookies(&state, session))
}

/// POST /auth/logout
pub async fn sign_out<Sp, I, P, T, V>(
    State(state): State<AuthState<Sp, I, P, T, V>>,
    headers: HeaderMap,
) -> Result<Response, AppError>
where
    Sp: SessionProvider + Clone + 'static,
    I: IdentityRepository + Clone + 'static,
    P: ProfileRepository + Clone + 'static,
    T: TeamRepository + Clone + 'static,
    V: InvitationRepository + Clone + 'static,
{
    if let Some(token) = extract_access_token(&headers, &state.config.session) {
        state.sessions.sign_out(&token).await?;
    }

    Ok((
        cleared_cookies(&state.config.session),
        Json(MessageResponse::new("Signed out")),
    )
        .into_response())
}

/// The caller's profile. 404 until provisioning has run.
///
/// GET /api/profile
pub async fn get_profile<Sp, I, P, T, V>(
    State(state): State<AuthState<Sp, I, P, T, V>>,
    session: CurrentSession,
) -> Result<Response, AppError>
where
    Sp: SessionProvider + Clone + 'static,
    I: IdentityRepository + Clone + 'static,
    P: ProfileRepository + Clone + 'static,
    T: TeamRepository + Clone + 'static,
    V: InvitationRepository + Clone + 'static,
{
    let profile = GetProfileAction::new(state.profiles)
        .execute(session.user.id)
        .await?
        .ok_or(SwiftError::NotFound)?;
    Ok(Json(profile).into_response())
}

/// Materialize the caller's profile, joining a team when an invite code is given.
///
/// POST /api/auth/create-profile
pub async fn create_profile<Sp, I, P, T, V>(
    State(state): State<AuthState<Sp, I, P, T, V>>,
    session: CurrentSession,
    Json(body): Json<CreateProfileRequest>,
) -> Result<Response, AppError>
where
    Sp: SessionProvider + Clone + 'static,
    I: IdentityRepository + Clone + 'static,
    P: ProfileRepository + Clone + 'static,
    T: TeamRepository + Clone + 'static,
    V: InvitationRepository + Clone + 'static,
{
    let action = CreateProfileAction::new(
        state.identities,
        state.profiles,
        state.teams,
        state.invitations,
    );
    let profile = action.execute(session.user.id, &body).await?;
    Ok(Json(profile).into_response())
}

/// POST /api/auth/verify-email
pub async fn verify_email<Sp, I, P, T, V>(
    State(state): State<AuthState<Sp, I, P, T, V>>,
    Json(body): Json<VerifyEmailRequest>,
) -> Result<Response, AppError>
where
    Sp: SessionProvider + Clone + 'static,
    I: IdentityRepository + Clone + 'static,
    P: ProfileRepository + Clone + 'static,
    T: TeamRepository + Clone + 'static,
    V: InvitationRepository + Clone + 'static,
{
    let outcome = SendVerificationAction::new(state.identities, state.invitations)
        .execute(&body.email)
        .await?;
    Ok(Json(MessageResponse::new(outcome.message())).into_response())
}

/// Invite an email address to the caller's team.
///
/// POST /api/team-invite
pub async fn create_invitation<Sp, I, P, T, V>(
    State(state): State<AuthState<Sp, I, P, T, V>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Json(body): Json<CreateInvitationRequest>,
) -> Result<Response, AppError>
where
    Sp: SessionProvider + Clone + 'static,
    I: IdentityRepository + Clone + 'static,
    P: ProfileRepository + Clone + 'static,
    T: TeamRepository + Clone + 'static,
    V: InvitationRepository + Clone + 'static,
{
    let action = CreateInvitationAction::with_config(
        state.teams,
        state.invitations,
        state.config.invitations.clone(),
    );
    let created = action.execute(&principal, &body.email).await?;
    Ok((StatusCode::CREATED, Json(created)).into_response())
}

/// Check an invitation code from the query string or a JSON body.
/// Invalid codes answer 400 with `valid: false`.
///
/// GET|POST /api/team-invite/validate
pub async fn validate_invitation<Sp, I, P, T, V>(
    State(state): State<AuthState<Sp, I, P, T, V>>,
    Query(query): Query<ValidateInvitationRequest>,
    body: Bytes,
) -> Result<Response, AppError>
where
    Sp: SessionProvider + Clone + 'static,
    I: IdentityRepository + Clone + 'static,
    P: ProfileRepository + Clone + 'static,
    T: TeamRepository + Clone + 'static,
    V: InvitationRepository + Clone + 'static,
{
    let from_body = if body.is_empty() {
        None
    } else {
        serde_json::from_slice::<ValidateInvitationRequest>(&body)
            .map_err(|e| SwiftError::Validation(format!("invalid request body: {e}")))?
            .code
    };
    let code = query.code.or(from_body).unwrap_or_default();

    let validation = ValidateInvitationAction::new(state.invitations)
        .execute(&code)
        .await?;
    let status = if validation.valid {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    Ok((status, Json(validation)).into_response())
}

pub async fn not_found() -> AppError {
    AppError(SwiftError::NotFound)
}
