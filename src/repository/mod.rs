//! Repository traits and data types.
//!
//! Storage abstractions used throughout swifttasks. Implement these traits to
//! back the service with your own database; the `sqlx_postgres` feature ships
//! PostgreSQL implementations.
//!
//! # Traits
//!
//! | Trait | Description |
//! |-------|-------------|
//! | [`IdentityRepository`] | Authentication identities and signup metadata |
//! | [`SessionTokenRepository`] | Hashed access/refresh token pairs |
//! | [`ProfileRepository`] | Application profiles keyed by identity id |
//! | [`TeamRepository`] | Teams and membership rows |
//! | [`InvitationRepository`] | Single-use team invitations |
//! | [`DocSpaceRepository`] | Documentation spaces and their pages |
//! | [`ProjectRepository`] | Projects, boards, columns and statuses |
//!
//! # Mock Implementations
//!
//! Enable the `mocks` feature for in-memory implementations useful for testing:
//!
//! - [`MockIdentityRepository`]
//! - [`MockSessionTokenRepository`]
//! - [`MockProfileRepository`]
//! - [`MockTeamRepository`]
//! - [`MockInvitationRepository`]
//! - [`MockDocSpaceRepository`]
//! - [`MockProjectRepository`]

mod doc_space;
mod identity;
mod invitation;
mod ownership;
mod profile;
mod project;
mod session_token;
mod team;

#[cfg(any(test, feature = "mocks"))]
mod doc_space_mock;
#[cfg(any(test, feature = "mocks"))]
mod identity_mock;
#[cfg(any(test, feature = "mocks"))]
mod invitation_mock;
#[cfg(any(test, feature = "mocks"))]
mod profile_mock;
#[cfg(any(test, feature = "mocks"))]
mod project_mock;
#[cfg(any(test, feature = "mocks"))]
mod session_token_mock;
#[cfg(any(test, feature = "mocks"))]
mod team_mock;

pub use doc_space::DocPage;
pub use doc_space::DocSpace;
pub use doc_space::DocSpaceRepository;
pub use doc_space::NewDocPage;
pub use doc_space::NewDocSpace;
pub use identity::Identity;
pub use identity::IdentityRepository;
pub use identity::NewIdentity;
pub use identity::SignupMetadata;
pub use invitation::Invitation;
pub use invitation::InvitationRepository;
pub use invitation::NewInvitation;
pub use ownership::Ownership;
pub use profile::AccountType;
pub use profile::NewProfile;
pub use profile::Profile;
pub use profile::ProfileRepository;
pub use project::BOARD_INDEX_RANGE;
pub use project::Board;
pub use project::BoardColumn;
pub use project::BoardStatus;
pub use project::LANE_POSITION_RANGE;
pub use project::NewBoard;
pub use project::NewProject;
pub use project::Project;
pub use project::ProjectRepository;
pub use session_token::NewSessionToken;
pub use session_token::SessionTokenRecord;
pub use session_token::SessionTokenRepository;
pub use team::Team;
pub use team::TeamMember;
pub use team::TeamRepository;

#[cfg(any(test, feature = "mocks"))]
pub use doc_space_mock::MockDocSpaceRepository;
#[cfg(any(test, feature = "mocks"))]
pub use identity_mock::MockIdentityRepository;
#[cfg(any(test, feature = "mocks"))]
pub use invitation_mock::MockInvitationRepository;
#[cfg(any(test, feature = "mocks"))]
pub use profile_mock::MockProfileRepository;
#[cfg(any(test, feature = "mocks"))]
pub use project_mock::MockProjectRepository;
#[cfg(any(test, feature = "mocks"))]
pub use session_token_mock::MockSessionTokenRepository;
#[cfg(any(test, feature = "mocks"))]
pub use team_mock::MockTeamRepository;
