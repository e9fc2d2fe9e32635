use async_trait::async_trait;

use super::AppEvent;

/// Handles application events asynchronously.
///
/// ```rust,ignore
/// use swifttasks::events::{AppEvent, Listener};
/// use async_trait::async_trait;
///
/// struct DeniedAccessCounter;
///
/// #[async_trait]
/// impl Listener for DeniedAccessCounter {
///     async fn handle(&self, event: &AppEvent) {
///         if let AppEvent::AccessDenied { reason, .. } = event {
///             // bump a counter keyed by reason
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Listener: Send + Sync + 'static {
    /// Called for every dispatched event. Filter by matching on the variant.
    async fn handle(&self, event: &AppEvent);
}
