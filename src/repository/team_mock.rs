#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::SwiftError;

use super::team::{Team, TeamMember, TeamRepository};

#[derive(Clone, Default)]
pub struct MockTeamRepository {
    pub teams: Arc<Mutex<Vec<Team>>>,
    pub members: Arc<Mutex<Vec<TeamMember>>>,
}

impl MockTeamRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TeamRepository for MockTeamRepository {
    async fn create(&self, name: &str) -> Result<Team, SwiftError> {
        let team = Team {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            created_by: None,
            created_at: Utc::now(),
        };

        let mut teams = self.teams.lock().unwrap();
        teams.push(team.clone());
        drop(teams);

        Ok(team)
    }

    async fn create_for_owner(&self, owner_id: Uuid, name: &str) -> Result<Team, SwiftError> {
        let mut teams = self.teams.lock().unwrap();
        if let Some(existing) = teams.iter().find(|t| t.created_by == Some(owner_id)) {
            return Ok(existing.clone());
        }
        let team = Team {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            created_by: Some(owner_id),
            created_at: Utc::now(),
        };
        teams.push(team.clone());
        drop(teams);

        Ok(team)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Team>, SwiftError> {
        let teams = self.teams.lock().unwrap();
        Ok(teams.iter().find(|t| t.id == id).cloned())
    }

    async fn add_member(&self, team_id: Uuid, user_id: Uuid) -> Result<TeamMember, SwiftError> {
        if !self.teams.lock().unwrap().iter().any(|t| t.id == team_id) {
            return Err(SwiftError::NotFound);
        }

        let mut members = self.members.lock().unwrap();
        if let Some(existing) = members
            .iter()
            .find(|m| m.team_id == team_id && m.user_id == user_id)
        {
            return Ok(existing.clone());
        }
        let member = TeamMember {
            team_id,
            user_id,
            joined_at: Utc::now(),
        };
        members.push(member.clone());
        drop(members);

        Ok(member)
    }

    async fn members(&self, team_id: Uuid) -> Result<Vec<TeamMember>, SwiftError> {
        let members = self.members.lock().unwrap();
        Ok(members
            .iter()
            .filter(|m| m.team_id == team_id)
            .cloned()
            .collect())
    }
}
