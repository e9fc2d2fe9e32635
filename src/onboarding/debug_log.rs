use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugEntry {
    pub at: DateTime<Utc>,
    pub message: String,
}

/// Bounded diagnostic log owned by one reconciler. The oldest entries are
/// dropped first. Every entry is mirrored to `log::debug!`.
#[derive(Debug, Clone)]
pub struct DebugLog {
    entries: Arc<Mutex<VecDeque<DebugEntry>>>,
    capacity: usize,
}

impl DebugLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn push(&self, message: impl Into<String>) {
        let message = message.into();
        log::debug!(target: "swifttasks::onboarding", "msg=\"{message}\"");

        if self.capacity == 0 {
            return;
        }
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(DebugEntry {
            at: Utc::now(),
            message,
        });
    }

    /// Entries oldest first.
    pub fn snapshot(&self) -> Vec<DebugEntry> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
