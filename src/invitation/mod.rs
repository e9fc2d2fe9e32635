//! Team invitation resolution on the client side.
//!
//! An invited user arrives on the registration page with `?invite=&email=`
//! and, when the link was emailed with a session attached, a token pair in
//! the URL fragment. [`InvitationResolver`] validates the code and accepts
//! the invitation either by adopting that session or through an ordinary
//! sign-up whose profile is provisioned in the background.

mod api;
mod params;
mod resolver;

#[cfg(feature = "client")]
pub use api::HttpInvitationApi;
pub use api::InvitationApi;
pub use params::{InviteParams, TokenFragment};
pub use resolver::{InvitationResolver, PendingIdentity, RegistrationKind};
