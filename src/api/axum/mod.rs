//! Axum routers for the SwiftTasks server.
//!
//! [`app`] assembles everything behind the route guard. The pieces are
//! exported separately for hosts that mount them on their own router.

mod cors;
mod dashboard;
mod error;
mod guard;
mod handlers;
mod middleware;
mod routes;

pub use cors::{default as default_cors, permissive as permissive_cors};
pub use error::{AppError, PageError};
pub use guard::route_guard;
pub use middleware::{
    CurrentPrincipal, CurrentSession, extract_access_token, extract_bearer_token, extract_cookie,
};
pub use routes::{
    AuthState, DashboardState, SessionState, api_routes, app, auth_routes, dashboard_routes,
};
