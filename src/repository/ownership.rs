use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validators::ValidationError;

/// Who a doc space or project belongs to. Never both, never neither.
///
/// Storage keeps two nullable columns guarded by a check constraint; this
/// type is the in-process mirror of that constraint so that rows read back
/// from storage are re-checked before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Ownership {
    Personal(Uuid),
    Team(Uuid),
}

impl Ownership {
    /// Rebuilds ownership from the `(owner_id, team_id)` column pair.
    pub fn from_columns(
        owner_id: Option<Uuid>,
        team_id: Option<Uuid>,
    ) -> Result<Self, ValidationError> {
        match (owner_id, team_id) {
            (Some(owner), None) => Ok(Self::Personal(owner)),
            (None, Some(team)) => Ok(Self::Team(team)),
            _ => Err(ValidationError::OwnershipConflict),
        }
    }

    pub fn owner_id(&self) -> Option<Uuid> {
        match self {
            Self::Personal(id) => Some(*id),
            Self::Team(_) => None,
        }
    }

    pub fn team_id(&self) -> Option<Uuid> {
        match self {
            Self::Personal(_) => None,
            Self::Team(id) => Some(*id),
        }
    }

    pub fn is_team(&self) -> bool {
        matches!(self, Self::Team(_))
    }
}
