//! Application events.
//!
//! Events are fired from actions, the provisioner and the onboarding
//! reconciler. If no listeners are registered they are dropped.
//!
//! ```rust,ignore
//! use swifttasks::register_event_listeners;
//! use swifttasks::events::listeners::LoggingListener;
//!
//! register_event_listeners(|registry| {
//!     registry.listen(LoggingListener::new());
//! });
//! ```

mod event;
mod listener;
mod registry;

pub mod listeners;

pub use event::AppEvent;
pub use listener::Listener;
pub use registry::{EventRegistry, dispatch, register_event_listeners};
