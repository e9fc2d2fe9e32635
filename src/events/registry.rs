use std::sync::OnceLock;

use super::{AppEvent, Listener};

static REGISTRY: OnceLock<EventRegistry> = OnceLock::new();

/// Listeners registered at start-up, called in registration order.
pub struct EventRegistry {
    listeners: Vec<Box<dyn Listener>>,
}

impl EventRegistry {
    fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn listen(&mut self, listener: impl Listener) -> &mut Self {
        self.listeners.push(Box::new(listener));
        self
    }

    async fn dispatch(&self, event: &AppEvent) {
        for listener in &self.listeners {
            listener.handle(event).await;
        }
    }
}

/// Register event listeners at application startup.
///
/// Only the first call takes effect; later calls log a warning.
pub fn register_event_listeners<F>(f: F)
where
    F: FnOnce(&mut EventRegistry),
{
    let mut registry = EventRegistry::new();
    f(&mut registry);
    if REGISTRY.set(registry).is_err() {
        log::warn!(
            target: "swifttasks",
            "register_event_listeners called more than once, ignoring"
        );
    }
}

/// Hands `event` to every registered listener, in order. Events fired
/// before registration are dropped.
pub async fn dispatch(event: AppEvent) {
    let Some(registry) = REGISTRY.get() else {
        return;
    };
    log::trace!(
        target: "swifttasks::events",
        "msg=\"dispatching event\", event={}, listeners={}",
        event.name(),
        registry.listeners.len()
    );
    registry.dispatch(&event).await;
}
