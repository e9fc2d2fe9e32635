use async_trait::async_trait;

use crate::events::{AppEvent, Listener};

/// Logs every event through the `log` facade.
pub struct LoggingListener {
    level: log::Level,
}

impl LoggingListener {
    /// Logs at INFO level.
    pub fn new() -> Self {
        Self {
            level: log::Level::Info,
        }
    }

    pub fn with_level(level: log::Level) -> Self {
        Self { level }
    }
}

impl Default for LoggingListener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Listener for LoggingListener {
    async fn handle(&self, event: &AppEvent) {
        log::log!(
            target: "swifttasks::events",
            self.level,
            "event={} at={} {:?}",
            event.name(),
            event.timestamp().to_rfc3339(),
            event
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_logging_listener_levels() {
        assert_eq!(LoggingListener::default().level, log::Level::Info);
        assert_eq!(
            LoggingListener::with_level(log::Level::Debug).level,
            log::Level::Debug
        );
    }

    #[tokio::test]
    async fn test_logging_listener_handle() {
        let listener = LoggingListener::new();
        let event = AppEvent::OnboardingCompleted {
            outcome: "login",
            attempts: 1,
            at: Utc::now(),
        };

        listener.handle(&event).await;
    }
}
