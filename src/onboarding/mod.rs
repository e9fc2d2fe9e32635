//! Onboarding reconciliation.
//!
//! Sign-up returns before the profile exists: provisioning runs in the
//! background. The [`Reconciler`] bridges that gap by probing for the profile
//! until it shows up, the user opts to continue, or there turns out to be no
//! signed-in identity at all.
//!
//! ```rust,ignore
//! let handle = Reconciler::spawn(HttpProfileProbe::new(api, token), config.onboarding);
//! match handle.completion().await {
//!     Completion::Dashboard(_) => redirect("/dashboard"),
//!     Completion::Login => redirect("/login"),
//!     Completion::Cancelled => {}
//! }
//! ```

mod debug_log;
mod probe;
mod reconciler;
mod state;

pub use debug_log::{DebugEntry, DebugLog};
#[cfg(feature = "client")]
pub use probe::HttpProfileProbe;
pub use probe::{ProbeOutcome, ProfileProbe, StoreProbe};
pub use reconciler::{Completion, Reconciler, ReconcilerHandle};
pub use state::{OnboardingEvent, OnboardingState, RedirectReason};
