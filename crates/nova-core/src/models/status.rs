//! Status enumerations for the project and its milestones.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Overall pipeline status of a project.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProjectStatus {
    /// Nothing is running
    #[default]
    Idle,

    /// The planning capability is building the roadmap
    Planning,

    /// Milestones are being synthesized
    Coding,

    /// A milestone's output is being validated
    Testing,

    /// The final design pass is rendering a diagram
    Designing,

    /// The run finished successfully
    Completed,

    /// Planning or execution aborted with an error
    Failed,
}

impl ProjectStatus {
    /// Upper-case label as shown in the status bar.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Idle => "IDLE",
            ProjectStatus::Planning => "PLANNING",
            ProjectStatus::Coding => "CODING",
            ProjectStatus::Testing => "TESTING",
            ProjectStatus::Designing => "DESIGNING",
            ProjectStatus::Completed => "COMPLETED",
            ProjectStatus::Failed => "FAILED",
        }
    }

    /// Whether a capability call is in flight in this status.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ProjectStatus::Planning
                | ProjectStatus::Coding
                | ProjectStatus::Testing
                | ProjectStatus::Designing
        )
    }
}

/// Type-safe enumeration of milestone statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneStatus {
    /// Waiting to be executed
    #[default]
    Pending,

    /// Currently being synthesized or validated
    Running,

    /// Synthesized (whether or not validation passed)
    Done,

    /// Marked failed by a manual override
    Failed,
}

impl FromStr for MilestoneStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" | "todo" => Ok(MilestoneStatus::Pending),
            "running" => Ok(MilestoneStatus::Running),
            "done" => Ok(MilestoneStatus::Done),
            "failed" => Ok(MilestoneStatus::Failed),
            _ => Err(format!("Invalid milestone status: {s}")),
        }
    }
}

impl MilestoneStatus {
    /// All statuses in the order the override controls list them.
    pub const ALL: [MilestoneStatus; 4] = [
        MilestoneStatus::Pending,
        MilestoneStatus::Running,
        MilestoneStatus::Done,
        MilestoneStatus::Failed,
    ];

    /// Lower-case string representation used for storage and parsing.
    pub fn as_str(&self) -> &'static str {
        match self {
            MilestoneStatus::Pending => "pending",
            MilestoneStatus::Running => "running",
            MilestoneStatus::Done => "done",
            MilestoneStatus::Failed => "failed",
        }
    }

    /// Get status with consistent icon formatting for display.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nova_core::models::MilestoneStatus;
    ///
    /// assert_eq!(MilestoneStatus::Done.with_icon(), "✓ Done");
    /// assert_eq!(MilestoneStatus::Running.with_icon(), "➤ Running");
    /// assert_eq!(MilestoneStatus::Pending.with_icon(), "○ Pending");
    /// assert_eq!(MilestoneStatus::Failed.with_icon(), "✗ Failed");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            MilestoneStatus::Done => "✓ Done",
            MilestoneStatus::Running => "➤ Running",
            MilestoneStatus::Pending => "○ Pending",
            MilestoneStatus::Failed => "✗ Failed",
        }
    }
}
