//! Configuration for sessions, onboarding, route protection and invitations.
//!
//! ```rust
//! use swifttasks::config::{OnboardingConfig, SwiftTasksConfig};
//! use std::time::Duration;
//!
//! let config = SwiftTasksConfig {
//!     onboarding: OnboardingConfig {
//!         poll_interval: Duration::from_secs(1),
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! };
//! assert_eq!(config.onboarding.override_threshold, 5);
//! ```

use std::time::Duration as StdDuration;

use chrono::Duration;

#[derive(Debug, Clone)]
pub struct SwiftTasksConfig {
    pub session: SessionConfig,
    pub onboarding: OnboardingConfig,
    pub routes: RouteConfig,
    pub invitations: InvitationConfig,
}

impl Default for SwiftTasksConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            onboarding: OnboardingConfig::default(),
            routes: RouteConfig::default(),
            invitations: InvitationConfig::default(),
        }
    }
}

impl SwiftTasksConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Long-lived sessions and a faster onboarding poll for local work.
    pub fn development() -> Self {
        Self {
            session: SessionConfig {
                access_token_expiry: Duration::hours(24),
                refresh_token_expiry: Duration::days(30),
                secure_cookies: false,
                require_email_verification: false,
                ..Default::default()
            },
            onboarding: OnboardingConfig {
                poll_interval: StdDuration::from_millis(500),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Short sessions and invitations.
    pub fn strict() -> Self {
        Self {
            session: SessionConfig {
                access_token_expiry: Duration::minutes(15),
                refresh_token_expiry: Duration::days(1),
                ..Default::default()
            },
            invitations: InvitationConfig {
                expiry: Duration::days(2),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

/// Token lifetimes for the local session provider.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Default: 1 hour
    pub access_token_expiry: Duration,
    /// Default: 14 days
    pub refresh_token_expiry: Duration,
    /// Default: 40 characters
    pub token_length: usize,
    /// Name of the cookie carrying the access token.
    pub access_cookie: &'static str,
    /// Name of the cookie carrying the refresh token.
    pub refresh_cookie: &'static str,
    /// Whether session cookies are marked `Secure`.
    pub secure_cookies: bool,
    /// When set, sign-up returns no session until the email is verified.
    pub require_email_verification: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            access_token_expiry: Duration::hours(1),
            refresh_token_expiry: Duration::days(14),
            token_length: crate::crypto::DEFAULT_TOKEN_LENGTH,
            access_cookie: "swifttasks-access-token",
            refresh_cookie: "swifttasks-refresh-token",
            secure_cookies: true,
            require_email_verification: true,
        }
    }
}

/// Tuning for the onboarding reconciler.
#[derive(Debug, Clone)]
pub struct OnboardingConfig {
    /// Delay between profile checks. Default: 2 seconds
    pub poll_interval: StdDuration,
    /// Failed attempts after which the user may skip ahead. Default: 5
    pub override_threshold: u32,
    /// Entries kept in the reconciler's debug ring buffer. Default: 100
    pub debug_log_capacity: usize,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            poll_interval: StdDuration::from_secs(2),
            override_threshold: 5,
            debug_log_capacity: 100,
        }
    }
}

/// Paths used by the route guard and by access-denied redirects.
#[derive(Debug, Clone)]
pub struct RouteConfig {
    /// Requests under this prefix need a session.
    pub protected_prefix: &'static str,
    pub login_path: &'static str,
    /// Pages that signed-in users are bounced away from.
    pub auth_entry_paths: Vec<&'static str>,
    /// Where signed-in users land.
    pub app_entry_path: &'static str,
    /// Safe listing for denied doc-space requests.
    pub docs_listing_path: &'static str,
    /// Safe listing for denied project requests.
    pub projects_listing_path: &'static str,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            protected_prefix: "/dashboard",
            login_path: "/login",
            auth_entry_paths: vec!["/login", "/register"],
            app_entry_path: "/dashboard",
            docs_listing_path: "/dashboard/docs",
            projects_listing_path: "/dashboard/projects",
        }
    }
}

impl RouteConfig {
    pub fn is_protected(&self, path: &str) -> bool {
        path == self.protected_prefix
            || path
                .strip_prefix(self.protected_prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    }

    pub fn is_auth_entry(&self, path: &str) -> bool {
        self.auth_entry_paths.iter().any(|p| *p == path)
    }
}

/// Team invitation settings.
#[derive(Debug, Clone)]
pub struct InvitationConfig {
    /// How long an invitation code stays valid. Default: 7 days
    pub expiry: Duration,
    /// Base URL of the registration page used to build invite links.
    pub register_url: String,
}

impl Default for InvitationConfig {
    fn default() -> Self {
        Self {
            expiry: Duration::days(7),
            register_url: "http://localhost:3000/register".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SwiftTasksConfig::default();
        assert_eq!(config.onboarding.poll_interval, StdDuration::from_secs(2));
        assert_eq!(config.onboarding.override_threshold, 5);
        assert_eq!(config.routes.login_path, "/login");
        assert_eq!(config.invitations.expiry, Duration::days(7));
    }

    #[test]
    fn test_presets_differ() {
        let dev = SwiftTasksConfig::development();
        let strict = SwiftTasksConfig::strict();
        assert!(dev.session.access_token_expiry > strict.session.access_token_expiry);
        assert!(strict.invitations.expiry < InvitationConfig::default().expiry);
    }

    #[test]
    fn test_protected_prefix_matching() {
        let routes = RouteConfig::default();
        assert!(routes.is_protected("/dashboard"));
        assert!(routes.is_protected("/dashboard/docs/1"));
        assert!(!routes.is_protected("/dashboards"));
        assert!(!routes.is_protected("/login"));
    }

    #[test]
    fn test_auth_entry_matching() {
        let routes = RouteConfig::default();
        assert!(routes.is_auth_entry("/login"));
        assert!(routes.is_auth_entry("/register"));
        assert!(!routes.is_auth_entry("/dashboard"));
    }
}
