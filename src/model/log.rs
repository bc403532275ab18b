use std::collections::VecDeque;

use chrono::{DateTime, Local};

/// How many events the operator log retains.
pub const EVENT_LOG_CAPACITY: usize = 5;

/// A single operator-visible event. Immutable once created.
#[derive(Clone, Debug)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
}

impl LogEntry {
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}

/// Bounded record of operator-visible events, newest first.
///
/// Appending at capacity evicts the oldest entry. Nothing else removes or
/// reorders entries.
pub struct EventLog {
    entries: VecDeque<LogEntry>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(EVENT_LOG_CAPACITY),
        }
    }

    /// Stamp `message` with the current wall-clock time and insert it at the
    /// front.
    pub fn append(&mut self, message: &str) {
        self.entries.push_front(LogEntry {
            timestamp: Local::now(),
            message: message.to_string(),
        });
        self.entries.truncate(EVENT_LOG_CAPACITY);
    }

    /// All retained entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_keeps_newest_first() {
        let mut log = EventLog::new();
        log.append("first");
        log.append("second");
        let messages: Vec<&str> = log.entries().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["second", "first"]);
    }

    #[test]
    fn append_evicts_oldest_beyond_capacity() {
        let mut log = EventLog::new();
        for i in 0..6 {
            log.append(&format!("event {}", i));
        }
        assert_eq!(log.len(), EVENT_LOG_CAPACITY);
        let messages: Vec<&str> = log.entries().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["event 5", "event 4", "event 3", "event 2", "event 1"]);
        assert!(!messages.contains(&"event 0"));
    }

    #[test]
    fn empty_log() {
        let log = EventLog::new();
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
    }
}
