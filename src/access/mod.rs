//! The access gate.
//!
//! Every dashboard request is evaluated against a `(session, profile)` pair
//! loaded by [`PrincipalLoader`]. The policy itself is a set of pure
//! functions over [`Principal`] and [`ResourceRef`]:
//!
//! | Function | Grants when |
//! |----------|-------------|
//! | [`can_access`] | the principal owns the resource, or belongs to its team |
//! | [`can_manage`] | direct owner, or team owner with team access |
//! | [`authorize`] | distinguishes a missing resource from a forbidden one |

mod gate;
mod principal;

pub use gate::{
    AccessDenied, Grant, Owned, Principal, ResourceRef, authorize, authorize_manage, can_access,
    can_manage,
};
pub use principal::PrincipalLoader;
