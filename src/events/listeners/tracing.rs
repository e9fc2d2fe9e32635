use async_trait::async_trait;

use crate::events::{AppEvent, Listener};

/// Emits events as `tracing` events. Requires the `tracing` feature.
pub struct TracingListener;

#[async_trait]
impl Listener for TracingListener {
    async fn handle(&self, event: &AppEvent) {
        tracing::info!(
            target: "swifttasks::events",
            event_name = event.name(),
            ?event,
            "app event"
        );
    }
}
