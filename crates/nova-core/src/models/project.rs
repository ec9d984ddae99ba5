//! Project state, the aggregate root persisted by the session store.

use serde::{Deserialize, Serialize};

use super::{LogEntry, LogStream, Plan, ProjectFile, ProjectStatus, Severity, Visual};

/// Which view a front end should open on after restoring a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Plan,
    Files,
    Preview,
    Visuals,
}

/// Everything the factory knows about the current project.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProjectState {
    #[serde(default)]
    pub status: ProjectStatus,

    /// Prompt of the current planning cycle
    #[serde(default)]
    pub prompt: String,

    #[serde(default)]
    pub plan: Plan,

    /// Generated artifacts, append-only
    #[serde(default)]
    pub files: Vec<ProjectFile>,

    #[serde(default)]
    pub logs: LogStream,

    #[serde(default)]
    pub visuals: Vec<Visual>,
}

impl ProjectState {
    /// Appends an entry to the log stream and returns a copy of it.
    pub fn log(
        &mut self,
        agent: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
    ) -> LogEntry {
        let entry = LogEntry::new(agent, message, severity);
        self.logs.push(entry.clone());
        entry
    }

    /// True when there is nothing worth persisting.
    pub fn is_blank(&self) -> bool {
        self.plan.is_empty() && self.files.is_empty() && self.logs.is_empty()
    }

    /// Context handed to the synthesis capability: every artifact's path and
    /// content, separated by blank lines.
    pub fn files_context(&self) -> String {
        self.files
            .iter()
            .map(|f| format!("FILE: {}\n{}", f.path, f.content))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Finds the most recently generated artifact with the given path.
    pub fn file(&self, path: &str) -> Option<&ProjectFile> {
        self.files.iter().rev().find(|f| f.path == path)
    }

    /// View to open on after a restore: the files once a finished build
    /// has produced some, the plan otherwise.
    pub fn preferred_view(&self) -> View {
        if !self.files.is_empty() && self.plan.iter().all(|m| m.is_done()) {
            View::Files
        } else {
            View::Plan
        }
    }
}
