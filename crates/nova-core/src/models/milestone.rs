//! Milestone model definition.

use serde::{Deserialize, Serialize};

use super::MilestoneStatus;

/// A single unit of planned work.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Milestone {
    /// Identifier, unique within a plan
    pub id: String,

    /// Brief title of the milestone
    pub title: String,

    /// Detailed description handed to the synthesis capability
    #[serde(default)]
    pub description: String,

    /// IDs of milestones this one depends on (advisory, used for connectors)
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Current status of the milestone
    #[serde(default)]
    pub status: MilestoneStatus,
}

impl Milestone {
    /// Creates a pending milestone without dependencies.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            dependencies: Vec::new(),
            status: MilestoneStatus::Pending,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the dependency list.
    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: MilestoneStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_done(&self) -> bool {
        self.status == MilestoneStatus::Done
    }

    pub fn depends_on(&self, id: &str) -> bool {
        self.dependencies.iter().any(|dep| dep == id)
    }
}
