use uuid::Uuid;

use crate::SwiftError;
use crate::repository::{DocSpace, Ownership, Profile, Project};

/// The authenticated user together with their profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    pub user_id: Uuid,
    pub email: String,
    pub profile: Profile,
}

impl Principal {
    pub fn team_id(&self) -> Option<Uuid> {
        self.profile.team_id
    }
}

/// Ownership columns of a resource as the gate sees them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceRef {
    pub id: Uuid,
    pub owner_id: Option<Uuid>,
    pub team_id: Option<Uuid>,
}

impl ResourceRef {
    pub fn new(id: Uuid, ownership: Ownership) -> Self {
        Self {
            id,
            owner_id: ownership.owner_id(),
            team_id: ownership.team_id(),
        }
    }
}

/// Anything the gate can evaluate.
pub trait Owned {
    fn resource_ref(&self) -> ResourceRef;
}

impl Owned for ResourceRef {
    fn resource_ref(&self) -> ResourceRef {
        *self
    }
}

impl Owned for DocSpace {
    fn resource_ref(&self) -> ResourceRef {
        ResourceRef::new(self.id, self.ownership)
    }
}

impl Owned for Project {
    fn resource_ref(&self) -> ResourceRef {
        ResourceRef::new(self.id, self.ownership)
    }
}

/// Direct ownership, or membership of the owning team.
pub fn can_access(principal: &Principal, resource: &impl Owned) -> bool {
    let resource = resource.resource_ref();
    resource.owner_id == Some(principal.user_id) || has_team_access(principal, &resource)
}

/// Direct ownership, or team ownership plus team access.
pub fn can_manage(principal: &Principal, resource: &impl Owned) -> bool {
    let resource = resource.resource_ref();
    resource.owner_id == Some(principal.user_id)
        || (principal.profile.owns_team() && has_team_access(principal, &resource))
}

fn has_team_access(principal: &Principal, resource: &ResourceRef) -> bool {
    resource.team_id.is_some() && principal.profile.team_id == resource.team_id
}

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDenied {
    NotFound,
    Forbidden,
}

impl AccessDenied {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
        }
    }
}

impl From<AccessDenied> for SwiftError {
    fn from(denied: AccessDenied) -> Self {
        match denied {
            AccessDenied::NotFound => SwiftError::NotFound,
            AccessDenied::Forbidden => SwiftError::Forbidden,
        }
    }
}

/// A successful access decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grant {
    pub can_manage: bool,
}

/// `None` is a missing resource; an inaccessible one is forbidden.
pub fn authorize<R: Owned>(principal: &Principal, resource: Option<&R>) -> Result<Grant, AccessDenied> {
    let resource = resource.ok_or(AccessDenied::NotFound)?;
    if !can_access(principal, resource) {
        return Err(AccessDenied::Forbidden);
    }
    Ok(Grant {
        can_manage: can_manage(principal, resource),
    })
}

/// Like [`authorize`], but viewing rights alone are forbidden.
pub fn authorize_manage<R: Owned>(
    principal: &Principal,
    resource: Option<&R>,
) -> Result<Grant, AccessDenied> {
    let grant = authorize(principal, resource)?;
    if !grant.can_manage {
        return Err(AccessDenied::Forbidden);
    }
    Ok(grant)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(profile: Profile) -> Principal {
        Principal {
            user_id: profile.id,
            email: profile.email.clone(),
            profile,
        }
    }

    fn personal(owner: Uuid) -> ResourceRef {
        ResourceRef::new(Uuid::new_v4(), Ownership::Personal(owner))
    }

    fn team(team_id: Uuid) -> ResourceRef {
        ResourceRef::new(Uuid::new_v4(), Ownership::Team(team_id))
    }

    #[test]
    fn test_owner_can_access_and_manage() {
        let solo = principal(Profile::mock_solo(Uuid::new_v4()));
        let resource = personal(solo.user_id);

        assert!(can_access(&solo, &resource));
        assert!(can_manage(&solo, &resource));
    }

    #[test]
    fn test_stranger_denied() {
        let solo = principal(Profile::mock_solo(Uuid::new_v4()));

        assert!(!can_access(&solo, &personal(Uuid::new_v4())));
        assert!(!can_access(&solo, &team(Uuid::new_v4())));
    }

    #[test]
    fn test_solo_without_team_never_matches_team_resource() {
        // a missing team id on both sides must not count as a match
        let solo = principal(Profile::mock_solo(Uuid::new_v4()));
        let orphan = ResourceRef {
            id: Uuid::new_v4(),
            owner_id: None,
            team_id: None,
        };
        assert!(!can_access(&solo, &orphan));
    }

    #[test]
    fn test_team_member_views_but_cannot_manage() {
        let team_id = Uuid::new_v4();
        let member = principal(Profile::mock_member(Uuid::new_v4(), team_id));
        let resource = team(team_id);

        assert!(can_access(&member, &resource));
        assert!(!can_manage(&member, &resource));
    }

    #[test]
    fn test_team_owner_manages_team_resources_only() {
        let team_id = Uuid::new_v4();
        let owner = principal(Profile::mock_owner(Uuid::new_v4(), team_id));

        assert!(can_manage(&owner, &team(team_id)));
        assert!(!can_manage(&owner, &team(Uuid::new_v4())));
        assert!(!can_manage(&owner, &personal(Uuid::new_v4())));
    }

    #[test]
    fn test_authorize_distinguishes_missing_from_forbidden() {
        let solo = principal(Profile::mock_solo(Uuid::new_v4()));

        assert_eq!(
            authorize::<ResourceRef>(&solo, None),
            Err(AccessDenied::NotFound)
        );
        assert_eq!(
            authorize(&solo, Some(&personal(Uuid::new_v4()))),
            Err(AccessDenied::Forbidden)
        );
        assert_eq!(
            authorize(&solo, Some(&personal(solo.user_id))),
            Ok(Grant { can_manage: true })
        );
    }

    #[test]
    fn test_authorize_manage_requires_manage_rights() {
        let team_id = Uuid::new_v4();
        let member = principal(Profile::mock_member(Uuid::new_v4(), team_id));

        assert_eq!(
            authorize_manage(&member, Some(&team(team_id))),
            Err(AccessDenied::Forbidden)
        );
    }

    #[test]
    fn test_denied_maps_to_errors() {
        assert_eq!(SwiftError::from(AccessDenied::NotFound), SwiftError::NotFound);
        assert_eq!(SwiftError::from(AccessDenied::Forbidden), SwiftError::Forbidden);
    }
}
