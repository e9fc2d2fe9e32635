//! Server-side use cases.
//!
//! Each action owns the repositories it needs and exposes a single
//! `execute`. Dashboard actions run every resource through the access gate
//! before touching it.

use chrono::Utc;
use uuid::Uuid;

use crate::access::{Grant, Owned, Principal, authorize, authorize_manage};
use crate::events::{AppEvent, dispatch};
use crate::SwiftError;

pub mod create_board;
pub mod create_doc_page;
pub mod create_doc_space;
pub mod create_invitation;
pub mod create_profile;
pub mod create_project;
pub mod get_profile;
pub mod list_doc_spaces;
pub mod list_projects;
pub mod provision_profile;
pub mod reorder_doc_pages;
pub mod send_verification;
pub mod validate_invitation;
pub mod view_doc_space;
pub mod view_project;

pub use create_board::CreateBoardAction;
pub use create_doc_page::CreateDocPageAction;
pub use create_doc_space::CreateDocSpaceAction;
pub use create_invitation::CreateInvitationAction;
pub use create_profile::CreateProfileAction;
pub use create_project::CreateProjectAction;
pub use get_profile::GetProfileAction;
pub use list_doc_spaces::ListDocSpacesAction;
pub use list_projects::ListProjectsAction;
pub use provision_profile::ProvisionProfileAction;
pub use reorder_doc_pages::ReorderDocPagesAction;
pub use send_verification::{SendVerificationAction, VerificationOutcome};
pub use validate_invitation::ValidateInvitationAction;
pub use view_doc_space::ViewDocSpaceAction;
pub use view_project::ViewProjectAction;

/// Runs the gate and reports refusals as events.
async fn guard<R: Owned>(
    principal: &Principal,
    resource_id: Uuid,
    resource: Option<&R>,
    manage: bool,
) -> Result<Grant, SwiftError> {
    let decision = if manage {
        authorize_manage(principal, resource)
    } else {
        authorize(principal, resource)
    };

    match decision {
        Ok(grant) => Ok(grant),
        Err(denied) => {
            log::info!(
                target: "swifttasks::access",
                "msg=\"access denied\", user_id={}, resource_id={}, reason={}",
                principal.user_id,
                resource_id,
                denied.as_str()
            );
            dispatch(AppEvent::AccessDenied {
                user_id: principal.user_id,
                resource_id,
                reason: denied.as_str(),
                at: Utc::now(),
            })
            .await;
            Err(denied.into())
        }
    }
}

async fn created(kind: &'static str, resource_id: Uuid, principal: &Principal) {
    log::info!(
        target: "swifttasks",
        "msg=\"{kind} created\", resource_id={resource_id}, user_id={}",
        principal.user_id
    );
    dispatch(AppEvent::ResourceCreated {
        kind,
        resource_id,
        user_id: principal.user_id,
        at: Utc::now(),
    })
    .await;
}

#[cfg(test)]
pub(crate) mod fixtures {
    use uuid::Uuid;

    use crate::access::Principal;
    use crate::repository::Profile;

    pub fn principal(profile: Profile) -> Principal {
        Principal {
            user_id: profile.id,
            email: profile.email.clone(),
            profile,
        }
    }

    pub fn solo() -> Principal {
        principal(Profile::mock_solo(Uuid::new_v4()))
    }

    pub fn member(team_id: Uuid) -> Principal {
        principal(Profile::mock_member(Uuid::new_v4(), team_id))
    }

    pub fn owner(team_id: Uuid) -> Principal {
        principal(Profile::mock_owner(Uuid::new_v4(), team_id))
    }
}
