//! Bounded, newest-first record of narrated events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of entries kept.
pub const DEFAULT_LOG_CAPACITY: usize = 5;

/// Who is speaking in a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    /// Environment events: failures, mode switches.
    System,
    /// The regulator's own metacognitive notes.
    Internal,
    /// What the agent says out loud.
    Ai,
}

impl LogKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Internal => "internal",
            Self::Ai => "ai",
        }
    }
}

/// An entry that has not been stamped yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narration {
    pub kind: LogKind,
    pub text: String,
}

impl Narration {
    pub fn new(kind: LogKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(LogKind::System, text)
    }

    pub fn internal(text: impl Into<String>) -> Self {
        Self::new(LogKind::Internal, text)
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self::new(LogKind::Ai, text)
    }
}

/// An immutable, stamped log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Monotonic within one log, never reused.
    pub id: u64,
    pub kind: LogKind,
    pub text: String,
    pub at: DateTime<Utc>,
}

/// Ordered sequence of at most `capacity` entries, newest first.
#[derive(Debug, Clone)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    next_id: u64,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }
}

impl EventLog {
    /// A capacity of zero is bumped to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
            next_id: 1,
        }
    }

    /// Stamp and insert at the front, evicting the oldest once over capacity.
    pub fn push(&mut self, narration: Narration) -> &LogEntry {
        let entry = LogEntry {
            id: self.next_id,
            kind: narration.kind,
            text: narration.text,
            at: Utc::now(),
        };
        self.next_id += 1;
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
        &self.entries[0]
    }

    /// Drop every entry. Ids keep counting from where they were.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> + '_ {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }
}
