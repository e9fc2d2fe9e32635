//! Session bootstrap, onboarding and access control for SwiftTasks.
//!
//! The crate is organised the same way on both sides of the wire:
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`access`] | The access gate: who may view or manage a resource |
//! | [`onboarding`] | Polls for a freshly provisioned profile after sign-up |
//! | [`invitation`] | Client-side team invitation resolution |
//! | [`session`] | Session provider trait and the local implementation |
//! | [`provisioning`] | Background profile materialization after sign-up |
//! | [`actions`] | Server-side use cases (invitations, profiles, docs, boards) |
//! | [`repository`] | Storage traits, data types and in-memory mocks |
//! | [`api`] | Request/response types and the Axum routers |

use std::fmt;

pub mod access;
pub mod actions;
pub mod api;
#[cfg(feature = "client")]
pub mod client;
pub mod config;
pub mod crypto;
pub mod events;
pub mod invitation;
pub mod onboarding;
pub mod provisioning;
pub mod repository;
mod secret;
pub mod session;
pub mod validators;

#[cfg(feature = "sqlx_postgres")]
pub mod postgres;

pub use config::SwiftTasksConfig;
pub use events::register_event_listeners;
pub use repository::{
    AccountType, Board, BoardColumn, BoardStatus, DocPage, DocSpace, Identity,
    IdentityRepository, Invitation, InvitationRepository, Ownership, Profile, ProfileRepository,
    Project, ProjectRepository, SessionTokenRepository, SignupMetadata, Team, TeamMember,
    TeamRepository, DocSpaceRepository,
};
#[cfg(any(test, feature = "mocks"))]
pub use repository::{
    MockDocSpaceRepository, MockIdentityRepository, MockInvitationRepository,
    MockProfileRepository, MockProjectRepository, MockSessionTokenRepository, MockTeamRepository,
};
pub use secret::SecretString;
pub use session::{Session, SessionProvider, SessionUser, SignUpOutcome};

/// Broad category of a [`SwiftError`], used to decide how a failure is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Session or credential failures. Routed to the login entry point.
    Auth,
    /// The resource does not exist. Rendered as a 404.
    NotFound,
    /// The resource exists but the principal lacks rights. Redirected to a safe listing.
    Forbidden,
    /// Malformed invitation or profile payloads. Shown to the user.
    Validation,
    /// Network or timeout failures that are worth retrying.
    Transient,
    /// Storage or programming errors.
    Internal,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SwiftError {
    /// No valid session, or the session could not be paired with a profile.
    Unauthenticated,
    InvalidCredentials,
    InvalidToken,
    TokenExpired,
    UserAlreadyExists,
    NotFound,
    Forbidden,
    Validation(String),
    /// The trusted profile endpoint refused to materialize a profile.
    ProfileCreationFailed(String),
    ProfileAlreadyExists,
    InvitationInvalid(String),
    Transient(String),
    DatabaseError(String),
    Internal(String),
}

impl SwiftError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthenticated
            | Self::InvalidCredentials
            | Self::InvalidToken
            | Self::TokenExpired
            | Self::UserAlreadyExists => ErrorKind::Auth,
            Self::NotFound => ErrorKind::NotFound,
            Self::Forbidden => ErrorKind::Forbidden,
            Self::Validation(_)
            | Self::ProfileCreationFailed(_)
            | Self::ProfileAlreadyExists
            | Self::InvitationInvalid(_) => ErrorKind::Validation,
            Self::Transient(_) => ErrorKind::Transient,
            Self::DatabaseError(_) | Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::NotFound => "NOT_FOUND",
            Self::Forbidden => "FORBIDDEN",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::ProfileCreationFailed(_) => "PROFILE_CREATION_FAILED",
            Self::ProfileAlreadyExists => "PROFILE_ALREADY_EXISTS",
            Self::InvitationInvalid(_) => "INVITATION_INVALID",
            Self::Transient(_) => "TEMPORARILY_UNAVAILABLE",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Short, friendly text that is safe to show to an end user.
    ///
    /// Backend details stay in [`Display`](fmt::Display) output, which is only logged.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthenticated => "Please sign in to continue.".to_owned(),
            Self::InvalidCredentials => "Invalid email or password.".to_owned(),
            Self::InvalidToken => "This link is invalid or incomplete.".to_owned(),
            Self::TokenExpired => "Your session has expired. Please sign in again.".to_owned(),
            Self::UserAlreadyExists => "An account with this email already exists.".to_owned(),
            Self::NotFound => "We couldn't find what you were looking for.".to_owned(),
            Self::Forbidden => "You don't have access to this.".to_owned(),
            Self::Validation(msg) | Self::InvitationInvalid(msg) => msg.clone(),
            Self::ProfileCreationFailed(msg) if !msg.is_empty() => msg.clone(),
            Self::ProfileCreationFailed(_) => "Failed to create user profile.".to_owned(),
            Self::ProfileAlreadyExists => "This account has already been set up.".to_owned(),
            Self::Transient(_) => "Something went wrong. Please try again.".to_owned(),
            Self::DatabaseError(_) | Self::Internal(_) => {
                "Something went wrong on our side.".to_owned()
            }
        }
    }
}

impl std::error::Error for SwiftError {}

impl fmt::Display for SwiftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "No valid session"),
            Self::InvalidCredentials => write!(f, "Invalid email or password"),
            Self::InvalidToken => write!(f, "Invalid token"),
            Self::TokenExpired => write!(f, "Token has expired"),
            Self::UserAlreadyExists => write!(f, "User already exists"),
            Self::NotFound => write!(f, "Resource not found"),
            Self::Forbidden => write!(f, "Access denied"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::ProfileCreationFailed(msg) => write!(f, "Profile creation failed: {msg}"),
            Self::ProfileAlreadyExists => write!(f, "Profile already exists"),
            Self::InvitationInvalid(msg) => write!(f, "Invalid invitation: {msg}"),
            Self::Transient(msg) => write!(f, "Transient error: {msg}"),
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl From<validators::ValidationError> for SwiftError {
    fn from(err: validators::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}
