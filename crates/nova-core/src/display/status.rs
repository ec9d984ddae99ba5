//! Status bar and confirmation lines.

use std::fmt;

use crate::models::{ProjectState, Severity};

/// One-line confirmation of an operation.
pub struct OperationStatus {
    pub message: String,
    pub severity: Severity,
}

impl OperationStatus {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Success)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Warning)
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Error)
    }

    fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.severity {
            Severity::Success => "Success:",
            Severity::Warning => "Warning:",
            Severity::Error => "Error:",
            Severity::Info => "Info:",
        };
        writeln!(f, "{prefix} {}", self.message)
    }
}

/// Header summary: pipeline status, milestone progress and history state.
pub struct StatusBar<'a> {
    pub state: &'a ProjectState,
    pub can_undo: bool,
    pub can_redo: bool,
}

impl<'a> fmt::Display for StatusBar<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plan = &self.state.plan;
        write!(
            f,
            "**{}** | {}/{} milestones | {} files",
            self.state.status,
            plan.completed(),
            plan.len(),
            self.state.files.len()
        )?;
        let mut history = Vec::new();
        if self.can_undo {
            history.push("undo");
        }
        if self.can_redo {
            history.push("redo");
        }
        if !history.is_empty() {
            write!(f, " | {} available", history.join("/"))?;
        }
        writeln!(f)?;
        if let Some(entry) = self.state.logs.latest() {
            writeln!(f, "> {entry}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Milestone, MilestoneStatus, Plan, ProjectStatus};

    #[test]
    fn test_operation_status_display() {
        assert_eq!(OperationStatus::success("Done").to_string(), "Success: Done\n");
        assert_eq!(OperationStatus::failure("Oops").to_string(), "Error: Oops\n");
    }

    #[test]
    fn test_status_bar() {
        let state = ProjectState {
            status: ProjectStatus::Coding,
            plan: Plan::from(vec![
                Milestone::new("a", "A").with_status(MilestoneStatus::Done),
                Milestone::new("b", "B"),
            ]),
            ..Default::default()
        };
        let bar = StatusBar {
            state: &state,
            can_undo: true,
            can_redo: false,
        };
        assert_eq!(bar.to_string(), "**CODING** | 1/2 milestones | 0 files | undo available\n");
    }
}
