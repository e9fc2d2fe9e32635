#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::SwiftError;

use super::invitation::{Invitation, InvitationRepository, NewInvitation};

#[derive(Clone, Default)]
pub struct MockInvitationRepository {
    pub invitations: Arc<Mutex<Vec<Invitation>>>,
}

impl MockInvitationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InvitationRepository for MockInvitationRepository {
    async fn create(&self, data: NewInvitation) -> Result<Invitation, SwiftError> {
        let mut invitations = self.invitations.lock().unwrap();
        if invitations.iter().any(|i| i.code == data.code) {
            return Err(SwiftError::Internal("duplicate invitation code".to_owned()));
        }

        let invitation = Invitation {
            code: data.code,
            email: data.email,
            team_id: data.team_id,
            team_name: data.team_name,
            invited_by: data.invited_by,
            expires_at: data.expires_at,
            accepted_at: None,
            created_at: Utc::now(),
        };
        invitations.push(invitation.clone());
        drop(invitations);

        Ok(invitation)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Invitation>, SwiftError> {
        let invitations = self.invitations.lock().unwrap();
        Ok(invitations.iter().find(|i| i.code == code).cloned())
    }

    async fn mark_accepted(&self, code: &str) -> Result<Invitation, SwiftError> {
        let mut invitations = self.invitations.lock().unwrap();
        let Some(invitation) = invitations.iter_mut().find(|i| i.code == code) else {
            return Err(SwiftError::NotFound);
        };
        if invitation.is_accepted() {
            return Err(SwiftError::InvitationInvalid(
                "invitation already used".to_owned(),
            ));
        }
        invitation.accepted_at = Some(Utc::now());
        Ok(invitation.clone())
    }

    async fn find_pending_by_team(&self, team_id: Uuid) -> Result<Vec<Invitation>, SwiftError> {
        let invitations = self.invitations.lock().unwrap();
        Ok(invitations
            .iter()
            .filter(|i| i.team_id == team_id && !i.is_accepted() && !i.is_expired())
            .cloned()
            .collect())
    }
}
