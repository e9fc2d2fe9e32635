use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repository::{
    Board, BoardColumn, BoardStatus, DocPage, DocSpace, Invitation, Project, SignupMetadata,
};

// Request DTOs

#[derive(Debug, Deserialize, Serialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub metadata: SignupMetadata,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SetSessionRequest {
    pub access_token: String,
    pub refresh_token: String,
}

/// The refresh token may also come from the refresh cookie.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    pub user_id: Uuid,
    pub email: String,
    pub display_name: String,
    #[serde(default)]
    pub team_id: Option<Uuid>,
    #[serde(default)]
    pub invite_code: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct VerifyEmailRequest {
    pub email: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ValidateInvitationRequest {
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateInvitationRequest {
    pub email: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateDocSpaceRequest {
    pub name: String,
    /// Owned by the caller's team instead of the caller.
    #[serde(default)]
    pub team: bool,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateDocPageRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ReorderDocPagesRequest {
    pub page_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateProjectRequest {
    pub title: String,
    #[serde(default)]
    pub team: bool,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateBoardRequest {
    pub title: String,
}

// Response DTOs

/// Client-facing view of a pending invitation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationDetails {
    pub email: String,
    pub team_id: Uuid,
    pub team_name: String,
    pub invite_code: String,
}

impl From<&Invitation> for InvitationDetails {
    fn from(invitation: &Invitation) -> Self {
        Self {
            email: invitation.email.clone(),
            team_id: invitation.team_id,
            team_name: invitation.team_name.clone(),
            invite_code: invitation.code.clone(),
        }
    }
}

/// Outcome of validating an invitation code. Invalid codes are a value, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationValidation {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invite: Option<InvitationDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InvitationValidation {
    pub fn valid(invite: InvitationDetails) -> Self {
        Self {
            valid: true,
            invite: Some(invite),
            error: None,
        }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            invite: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InvitationCreatedResponse {
    pub code: String,
    pub email: String,
    pub expires_at: DateTime<Utc>,
    pub invite_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocSpaceView {
    pub space: DocSpace,
    pub pages: Vec<DocPage>,
    pub can_manage: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BoardView {
    pub board: Board,
    pub columns: Vec<BoardColumn>,
    pub statuses: Vec<BoardStatus>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectView {
    pub project: Project,
    pub boards: Vec<BoardView>,
    pub can_manage: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: String,
}

impl From<&crate::SwiftError> for ErrorResponse {
    fn from(err: &crate::SwiftError) -> Self {
        ErrorResponse {
            message: err.user_message(),
            code: err.code().to_owned(),
        }
    }
}
