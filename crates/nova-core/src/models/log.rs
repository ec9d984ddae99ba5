//! Log stream entries.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Source labels used by the pipeline.
pub mod agent {
    pub const NOVA: &str = "NovaMinds";
    pub const PLANNER: &str = "Planner";
    pub const CODER: &str = "Coder";
    pub const TESTER: &str = "Tester";
    pub const DESIGNER: &str = "Designer";
    pub const SYSTEM: &str = "System";
    pub const USER: &str = "User";
}

/// Severity tag of a log entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// One event in the project's log stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogEntry {
    pub id: String,

    /// Free-form source label ("Planner", "Coder", "User", ...)
    pub agent: String,

    pub message: String,

    /// UTC instant; serialized as RFC 3339 text
    pub timestamp: Timestamp,

    #[serde(rename = "type")]
    pub severity: Severity,
}

impl LogEntry {
    /// Creates an entry stamped with the current time.
    pub fn new(agent: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            agent: agent.into(),
            message: message.into(),
            timestamp: Timestamp::now(),
            severity,
        }
    }
}

/// Append-only feed, stored most-recent-first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct LogStream(Vec<LogEntry>);

impl LogStream {
    /// Adds an entry to the front of the stream.
    pub fn push(&mut self, entry: LogEntry) {
        self.0.insert(0, entry);
    }

    /// Entries, newest first.
    pub fn entries(&self) -> &[LogEntry] {
        &self.0
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.0.first()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.0.iter()
    }
}
