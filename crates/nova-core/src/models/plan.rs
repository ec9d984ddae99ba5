//! Plan model definition and read-only accessors.
//!
//! Mutating operations live in [`crate::graph`].

use std::ops::Index;

use serde::{Deserialize, Serialize};

use super::{Milestone, MilestoneStatus};

/// The ordered collection of milestones for one project.
///
/// Order is significant: it is the execution order. Dependencies only feed
/// the connector overlay.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Plan {
    pub(crate) milestones: Vec<Milestone>,
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.milestones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.milestones.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Milestone> {
        self.milestones.iter()
    }

    pub fn milestones(&self) -> &[Milestone] {
        &self.milestones
    }

    /// Looks up a milestone by ID.
    pub fn get(&self, id: &str) -> Option<&Milestone> {
        self.milestones.iter().find(|m| m.id == id)
    }

    /// Index of the milestone with the given ID.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.milestones.iter().position(|m| m.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// IDs in plan order.
    pub fn ids(&self) -> Vec<&str> {
        self.milestones.iter().map(|m| m.id.as_str()).collect()
    }

    /// Status of the milestone with the given ID.
    pub fn status_of(&self, id: &str) -> Option<MilestoneStatus> {
        self.get(id).map(|m| m.status)
    }

    /// Number of milestones with status `done`.
    pub fn completed(&self) -> usize {
        self.milestones.iter().filter(|m| m.is_done()).count()
    }

    /// Share of `done` milestones, 0-100.
    pub fn progress(&self) -> f64 {
        if self.milestones.is_empty() {
            0.0
        } else {
            self.completed() as f64 / self.milestones.len() as f64 * 100.0
        }
    }

    /// True when there is at least one milestone and all are `done`.
    pub fn is_complete(&self) -> bool {
        !self.milestones.is_empty() && self.milestones.iter().all(Milestone::is_done)
    }

    /// Index of the first milestone a run would pick up.
    pub fn next_pending(&self) -> Option<usize> {
        self.milestones.iter().position(|m| !m.is_done())
    }
}

impl From<Vec<Milestone>> for Plan {
    fn from(milestones: Vec<Milestone>) -> Self {
        Self { milestones }
    }
}

impl From<Plan> for Vec<Milestone> {
    fn from(plan: Plan) -> Self {
        plan.milestones
    }
}

impl Index<usize> for Plan {
    type Output = Milestone;

    fn index(&self, index: usize) -> &Self::Output {
        &self.milestones[index]
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a Milestone;
    type IntoIter = std::slice::Iter<'a, Milestone>;

    fn into_iter(self) -> Self::IntoIter {
        self.milestones.iter()
    }
}
