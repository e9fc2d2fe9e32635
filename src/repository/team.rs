use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::SwiftError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    /// Identity that founded the team at sign-up, if any.
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Link row between a team and a user. Composite key `(team_id, user_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn create(&self, name: &str) -> Result<Team, SwiftError>;

    /// Creates the team founded by `owner_id`. An owner founds at most one
    /// team; calling this again returns that team unchanged.
    async fn create_for_owner(&self, owner_id: Uuid, name: &str) -> Result<Team, SwiftError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Team>, SwiftError>;

    /// Adding an existing member returns the existing row.
    async fn add_member(&self, team_id: Uuid, user_id: Uuid) -> Result<TeamMember, SwiftError>;

    async fn members(&self, team_id: Uuid) -> Result<Vec<TeamMember>, SwiftError>;
}
