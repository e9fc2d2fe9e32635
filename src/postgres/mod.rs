//! PostgreSQL repositories backed by `sqlx`.
//!
//! ```rust,ignore
//! let pool = sqlx::PgPool::connect(&database_url).await?;
//! swifttasks::postgres::migrations::run(&pool).await?;
//! let repos = swifttasks::postgres::create_repositories(pool);
//! ```

mod doc_space;
mod identity;
mod invitation;
pub mod migrations;
mod profile;
mod project;
mod session_token;
mod team;

pub use doc_space::PostgresDocSpaceRepository;
pub use identity::PostgresIdentityRepository;
pub use invitation::PostgresInvitationRepository;
pub use profile::PostgresProfileRepository;
pub use project::PostgresProjectRepository;
pub use session_token::PostgresSessionTokenRepository;
pub use team::PostgresTeamRepository;

use sqlx::PgPool;
use uuid::Uuid;

use crate::repository::Ownership;
use crate::SwiftError;

/// Every Postgres repository, sharing one pool.
#[derive(Clone)]
pub struct PostgresRepositories {
    pub identities: PostgresIdentityRepository,
    pub session_tokens: PostgresSessionTokenRepository,
    pub profiles: PostgresProfileRepository,
    pub teams: PostgresTeamRepository,
    pub invitations: PostgresInvitationRepository,
    pub doc_spaces: PostgresDocSpaceRepository,
    pub projects: PostgresProjectRepository,
}

pub fn create_repositories(pool: PgPool) -> PostgresRepositories {
    PostgresRepositories {
        identities: PostgresIdentityRepository::new(pool.clone()),
        session_tokens: PostgresSessionTokenRepository::new(pool.clone()),
        profiles: PostgresProfileRepository::new(pool.clone()),
        teams: PostgresTeamRepository::new(pool.clone()),
        invitations: PostgresInvitationRepository::new(pool.clone()),
        doc_spaces: PostgresDocSpaceRepository::new(pool.clone()),
        projects: PostgresProjectRepository::new(pool),
    }
}

/// Maps driver errors. Pool exhaustion and I/O failures are retryable.
pub(crate) fn db_error(e: sqlx::Error) -> SwiftError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => SwiftError::Transient(e.to_string()),
        _ => SwiftError::DatabaseError(e.to_string()),
    }
}

pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|d| d.is_unique_violation())
}

pub(crate) fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|d| d.is_foreign_key_violation())
}

pub(crate) fn ownership(owner_id: Option<Uuid>, team_id: Option<Uuid>) -> Result<Ownership, SwiftError> {
    Ownership::from_columns(owner_id, team_id)
        .map_err(|e| SwiftError::DatabaseError(format!("corrupt ownership row: {e}")))
}
