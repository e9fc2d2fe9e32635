//! Sessions: an opaque access/refresh token pair bound to an identity.
//!
//! [`SessionProvider`] is the seam between the rest of the crate and whatever
//! issues sessions. [`LocalSessionProvider`] issues them from the identity and
//! session-token repositories; with the `client` feature
//! [`HttpSessionProvider`] talks to the `/auth` routes of a running server.

mod cookie;
#[cfg(feature = "client")]
mod http;
mod local;
mod provider;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::SecretString;

pub use cookie::{clear_cookie, read_cookie, session_cookie};
#[cfg(feature = "client")]
pub use http::HttpSessionProvider;
pub use local::LocalSessionProvider;
pub use provider::SessionProvider;

/// The user a session is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: SecretString,
    pub refresh_token: SecretString,
    pub user: SessionUser,
    /// Expiry of the access token.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Result of a sign-up. `session` is `None` while the email awaits verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpOutcome {
    pub user: SessionUser,
    pub session: Option<Session>,
}
