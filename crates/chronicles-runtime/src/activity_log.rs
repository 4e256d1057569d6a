//! In-memory usage log shown on the activity panel.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// One recorded usage event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub timestamp: DateTime<Utc>,
    pub event: String,
    pub details: String,
}

/// Shared, newest-first list of usage events.
///
/// Cloning yields another handle onto the same log, so the data manager and
/// the assistant can record into one timeline.
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    entries: Arc<Mutex<VecDeque<ActivityEntry>>>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend an event stamped with the current time.
    pub fn record(&self, event: impl Into<String>, details: impl Into<String>) {
        let entry = ActivityEntry {
            timestamp: Utc::now(),
            event: event.into(),
            details: details.into(),
        };
        info!(event = %entry.event, "{}", entry.details);
        self.lock().push_front(entry);
    }

    /// Snapshot of all events, newest first.
    pub fn entries(&self) -> Vec<ActivityEntry> {
        self.lock().iter().cloned().collect()
    }

    /// Most recent event, if any.
    pub fn latest(&self) -> Option<ActivityEntry> {
        self.lock().front().cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<ActivityEntry>> {
        // A panic while holding the lock cannot leave the deque half-written.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_log_is_empty() {
        let log = ActivityLog::new();
        assert!(log.is_empty());
        assert!(log.latest().is_none());
    }

    #[test]
    fn test_entries_are_newest_first() {
        let log = ActivityLog::new();
        log.record("Data Load", "Loaded Sample Data");
        log.record("Agent Chat", "Used NLP ANALYZER with gemini-2.5-flash");

        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].event, "Agent Chat");
        assert_eq!(entries[1].event, "Data Load");
        assert!(entries[0].timestamp >= entries[1].timestamp);
        assert_eq!(log.latest().unwrap().event, "Agent Chat");
    }

    #[test]
    fn test_clones_share_entries() {
        let log = ActivityLog::new();
        let handle = log.clone();
        handle.record("Note Upload", "Text file uploaded notes.md");
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].details, "Text file uploaded notes.md");
    }
}
