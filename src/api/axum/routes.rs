use std::sync::Arc;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};

use super::guard::route_guard;
use super::{dashboard, handlers};
use crate::config::SwiftTasksConfig;
use crate::provisioning::ProvisionerHandle;
use crate::repository::{
    DocSpaceRepository, IdentityRepository, InvitationRepository, ProfileRepository,
    ProjectRepository, TeamRepository,
};
use crate::session::SessionProvider;

/// State that can resolve a request's session and profile.
///
/// Implemented by both route states so that the extractors and the route
/// guard work on either.
pub trait SessionState: Clone + Send + Sync + 'static {
    type Sessions: SessionProvider + Clone + 'static;
    type Profiles: ProfileRepository + Clone + 'static;

    fn sessions(&self) -> &Self::Sessions;
    fn profiles(&self) -> &Self::Profiles;
    fn config(&self) -> &SwiftTasksConfig;
}

/// State for the `/auth` and `/api` routes.
#[derive(Clone)]
pub struct AuthState<Sp, I, P, T, V> {
    pub sessions: Sp,
    pub identities: I,
    pub profiles: P,
    pub teams: T,
    pub invitations: V,
    /// Sign-ups are queued here for profile provisioning.
    pub provisioner: ProvisionerHandle,
    pub config: Arc<SwiftTasksConfig>,
}

impl<Sp, I, P, T, V> SessionState for AuthState<Sp, I, P, T, V>
where
    Sp: SessionProvider + Clone + 'static,
    I: Clone + Send + Sync + 'static,
    P: ProfileRepository + Clone + 'static,
    T: Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    type Sessions = Sp;
    type Profiles = P;

    fn sessions(&self) -> &Sp {
        &self.sessions
    }

    fn profiles(&self) -> &P {
        &self.profiles
    }

    fn config(&self) -> &SwiftTasksConfig {
        &self.config
    }
}

/// State for the `/dashboard` routes.
#[derive(Clone)]
pub struct DashboardState<Sp, P, D, R> {
    pub sessions: Sp,
    pub profiles: P,
    pub doc_spaces: D,
    pub projects: R,
    pub config: Arc<SwiftTasksConfig>,
}

impl<Sp, P, D, R> SessionState for DashboardState<Sp, P, D, R>
where
    Sp: SessionProvider + Clone + 'static,
    P: ProfileRepository + Clone + 'static,
    D: Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
{
    type Sessions = Sp;
    type Profiles = P;

    fn sessions(&self) -> &Sp {
        &self.sessions
    }

    fn profiles(&self) -> &P {
        &self.profiles
    }

    fn config(&self) -> &SwiftTasksConfig {
        &self.config
    }
}

/// Session routes, meant to be nested under `/auth`.
///
/// - `POST /signup`
/// - `POST /login`
/// - `GET /session`, `POST /session`
/// - `POST /refresh`
/// - `POST /logout`
pub fn auth_routes<Sp, I, P, T, V>() -> Router<AuthState<Sp, I, P, T, V>>
where
    Sp: SessionProvider + Clone + 'static,
    I: IdentityRepository + Clone + 'static,
    P: ProfileRepository + Clone + 'static,
    T: TeamRepository + Clone + 'static,
    V: InvitationRepository + Clone + 'static,
{
    Router::new()
        .route("/signup", post(handlers::sign_up::<Sp, I, P, T, V>))
        .route("/login", post(handlers::sign_in::<Sp, I, P, T, V>))
        .route(
            "/session",
            get(handlers::get_session::<Sp, I, P, T, V>)
                .post(handlers::set_session::<Sp, I, P, T, V>),
        )
        .route("/refresh", post(handlers::refresh::<Sp, I, P, T, V>))
        .route("/logout", post(handlers::sign_out::<Sp, I, P, T, V>))
}

/// Profile and invitation endpoints, mounted at the root.
pub fn api_routes<Sp, I, P, T, V>() -> Router<AuthState<Sp, I, P, T, V>>
where
    Sp: SessionProvider + Clone + 'static,
    I: IdentityRepository + Clone + 'static,
    P: ProfileRepository + Clone + 'static,
    T: TeamRepository + Clone + 'static,
    V: InvitationRepository + Clone + 'static,
{
    Router::new()
        .route("/api/profile", get(handlers::get_profile::<Sp, I, P, T, V>))
        .route(
            "/api/auth/create-profile",
            post(handlers::create_profile::<Sp, I, P, T, V>),
        )
        .route(
            "/api/auth/verify-email",
            post(handlers::verify_email::<Sp, I, P, T, V>),
        )
        .route(
            "/api/team-invite",
            post(handlers::create_invitation::<Sp, I, P, T, V>),
        )
        .route(
            "/api/team-invite/validate",
            get(handlers::validate_invitation::<Sp, I, P, T, V>)
                .post(handlers::validate_invitation::<Sp, I, P, T, V>),
        )
}

/// Doc space and project routes, mounted at the root.
pub fn dashboard_routes<Sp, P, D, R>() -> Router<DashboardState<Sp, P, D, R>>
where
    Sp: SessionProvider + Clone + 'static,
    P: ProfileRepository + Clone + 'static,
    D: DocSpaceRepository + Clone + 'static,
    R: ProjectRepository + Clone + 'static,
{
    Router::new()
        .route(
            "/dashboard/docs",
            get(dashboard::list_doc_spaces::<Sp, P, D, R>)
                .post(dashboard::create_doc_space::<Sp, P, D, R>),
        )
        .route(
            "/dashboard/docs/{space_id}",
            get(dashboard::view_doc_space::<Sp, P, D, R>),
        )
        .route(
            "/dashboard/docs/{space_id}/pages",
            post(dashboard::create_doc_page::<Sp, P, D, R>),
        )
        .route(
            "/dashboard/docs/{space_id}/pages/order",
            put(dashboard::reorder_doc_pages::<Sp, P, D, R>),
        )
        .route(
            "/dashboard/projects",
            get(dashboard::list_projects::<Sp, P, D, R>)
                .post(dashboard::create_project::<Sp, P, D, R>),
        )
        .route(
            "/dashboard/projects/{project_id}",
            get(dashboard::view_project::<Sp, P, D, R>),
        )
        .route(
            "/dashboard/projects/{project_id}/boards",
            post(dashboard::create_board::<Sp, P, D, R>),
        )
}

/// Every route behind the route guard.
///
/// ```rust,ignore
/// let app = swifttasks::api::axum::app(auth_state, dashboard_state)
///     .layer(swifttasks::api::axum::default_cors(&["https://app.example.com"]));
/// ```
pub fn app<Sp, I, P, T, V, D, R>(
    auth: AuthState<Sp, I, P, T, V>,
    dashboard: DashboardState<Sp, P, D, R>,
) -> Router
where
    Sp: SessionProvider + Clone + 'static,
    I: IdentityRepository + Clone + 'static,
    P: ProfileRepository + Clone + 'static,
    T: TeamRepository + Clone + 'static,
    V: InvitationRepository + Clone + 'static,
    D: DocSpaceRepository + Clone + 'static,
    R: ProjectRepository + Clone + 'static,
{
    let guard_state = dashboard.clone();

    Router::new()
        .nest("/auth", auth_routes().with_state(auth.clone()))
        .merge(api_routes().with_state(auth))
        .merge(dashboard_routes().with_state(dashboard))
        .fallback(handlers::not_found)
        .layer(from_fn_with_state(
            guard_state,
            route_guard::<DashboardState<Sp, P, D, R>>,
        ))
}
