//! Result wrapper types for displaying the outcome of milestone edits.

use std::fmt;

use crate::models::{Milestone, MilestoneStatus};

/// A milestone that was just added.
///
/// # Examples
///
/// ```rust
/// use nova_core::{display::CreateResult, models::Milestone};
///
/// let result = CreateResult::new(Milestone::new("step-1", "Add auth"));
/// println!("{}", result);
/// ```
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<Milestone> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Added milestone '{}'", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// A milestone after an edit, with the list of what changed.
pub struct UpdateResult<T> {
    pub resource: T,
    pub changes: Vec<String>,
}

impl<T> UpdateResult<T> {
    pub fn new(resource: T) -> Self {
        Self {
            resource,
            changes: Vec::new(),
        }
    }

    pub fn with_changes(resource: T, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }
}

impl UpdateResult<Milestone> {
    /// Describes the differences between two versions of a milestone.
    pub fn between(previous: &Milestone, updated: Milestone) -> Self {
        let mut changes = Vec::new();
        if previous.title != updated.title {
            changes.push(format!("Title: '{}' → '{}'", previous.title, updated.title));
        }
        if previous.description != updated.description {
            changes.push("Updated description".to_string());
        }
        if previous.dependencies != updated.dependencies {
            changes.push(format!(
                "Dependencies: [{}] → [{}]",
                previous.dependencies.join(", "),
                updated.dependencies.join(", ")
            ));
        }
        if previous.status != updated.status {
            changes.push(status_change(previous.status, updated.status));
        }
        Self::with_changes(updated, changes)
    }
}

/// `Status: pending → done`
pub fn status_change(from: MilestoneStatus, to: MilestoneStatus) -> String {
    format!("Status: {from} → {to}")
}

impl fmt::Display for UpdateResult<Milestone> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated milestone '{}'", self.resource.id)?;

        if !self.changes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }

        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// A milestone that was removed.
pub struct DeleteResult<T> {
    pub resource: T,
}

impl<T> DeleteResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for DeleteResult<Milestone> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Deleted milestone '{}' ({})",
            self.resource.title, self.resource.id
        )
    }
}
