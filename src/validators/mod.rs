//! Input validation for registration, invitations, profiles and titles.

mod email;
mod invite_code;
mod name;
mod password;
mod title;

pub use email::validate_email;
pub use invite_code::validate_invite_code;
pub use name::{validate_display_name, validate_team_name};
pub use password::validate_password;
pub use title::{TitleRule, validate_title};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmailEmpty,
    EmailTooLong,
    EmailInvalidFormat,
    PasswordTooShort,
    PasswordTooLong,
    DisplayNameEmpty,
    DisplayNameTooLong,
    TeamNameLength,
    InviteCodeInvalid,
    TitleLength { field: &'static str, min: usize, max: usize },
    OwnershipConflict,
    AccountTeamMismatch(&'static str),
    OrderOutOfRange { field: &'static str, min: i32, max: i32 },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmailEmpty => write!(f, "Email cannot be empty"),
            Self::EmailTooLong => write!(f, "Email is too long (max 254 characters)"),
            Self::EmailInvalidFormat => write!(f, "Invalid email format"),
            Self::PasswordTooShort => write!(f, "Password must be at least 8 characters long"),
            Self::PasswordTooLong => write!(f, "Password is too long (max 128 characters)"),
            Self::DisplayNameEmpty => write!(f, "Name cannot be empty"),
            Self::DisplayNameTooLong => write!(f, "Name is too long (max 100 characters)"),
            Self::TeamNameLength => write!(f, "Team name must be between 3 and 100 characters"),
            Self::InviteCodeInvalid => write!(f, "Invitation code is malformed"),
            Self::TitleLength { field, min, max } => {
                write!(f, "{field} must be between {min} and {max} characters")
            }
            Self::OwnershipConflict => {
                write!(f, "Exactly one of owner or team must be set")
            }
            Self::AccountTeamMismatch(rule) => write!(f, "Inconsistent account: {rule}"),
            Self::OrderOutOfRange { field, min, max } => {
                write!(f, "{field} must be between {min} and {max}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
