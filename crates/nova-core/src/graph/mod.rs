//! Plan graph editing operations.
//!
//! These are the raw mutators over a [`Plan`]. They validate their input and
//! keep the plan's invariants (unique IDs, dependencies that reference
//! existing milestones, no self-dependency, no cycle) but know nothing about
//! undo history or persistence; [`crate::orchestrator`] wraps them for that.
//!
//! Deleting a milestone prunes it from every other milestone's dependency
//! list in the same step, so dangling references never survive an edit.

use std::collections::{HashMap, HashSet};

use log::warn;

use crate::{
    capability::PlanDraft,
    error::{FactoryError, Result},
    models::{Milestone, MilestoneStatus, Plan},
};

pub mod deps;

#[cfg(test)]
mod tests;

impl Plan {
    /// Appends a milestone. Its status is forced to `pending`.
    pub fn add(&mut self, mut milestone: Milestone) -> Result<()> {
        if milestone.id.trim().is_empty() {
            return Err(FactoryError::invalid_input("id").with_reason("must not be empty"));
        }
        if self.contains(&milestone.id) {
            return Err(FactoryError::DuplicateMilestone { id: milestone.id });
        }
        milestone.status = MilestoneStatus::Pending;
        milestone.dependencies = dedup(milestone.dependencies);
        self.check_fields(&milestone)?;
        self.check_dependencies(&milestone)?;

        self.milestones.push(milestone);
        Ok(())
    }

    /// Replaces the milestone with the same ID wholesale and returns the
    /// previous version.
    pub fn replace(&mut self, mut updated: Milestone) -> Result<Milestone> {
        let index = self
            .position(&updated.id)
            .ok_or_else(|| FactoryError::MilestoneNotFound {
                id: updated.id.clone(),
            })?;
        updated.dependencies = dedup(updated.dependencies);
        self.check_fields(&updated)?;
        self.check_dependencies(&updated)?;

        let mut candidate = self.milestones.clone();
        candidate[index] = updated.clone();
        if deps::find_cycle(&candidate).is_some() {
            return Err(FactoryError::CyclicDependency { id: updated.id });
        }

        Ok(std::mem::replace(&mut self.milestones[index], updated))
    }

    /// Removes a milestone, pruning references to it from the rest of the
    /// plan. Returns the removed milestone.
    pub fn remove(&mut self, id: &str) -> Result<Milestone> {
        let index = self
            .position(id)
            .ok_or_else(|| FactoryError::MilestoneNotFound { id: id.to_string() })?;
        let removed = self.milestones.remove(index);
        for milestone in &mut self.milestones {
            milestone.dependencies.retain(|dep| dep != id);
        }
        Ok(removed)
    }

    /// Replaces the execution order. `ids` must be a permutation of the
    /// current milestone IDs.
    pub fn reorder<S: AsRef<str>>(&mut self, ids: &[S]) -> Result<()> {
        if ids.len() != self.milestones.len() {
            return Err(FactoryError::InvalidReorder {
                reason: format!(
                    "expected {} milestone IDs, got {}",
                    self.milestones.len(),
                    ids.len()
                ),
            });
        }

        let mut seen = HashSet::new();
        for id in ids {
            let id = id.as_ref();
            if !seen.insert(id) {
                return Err(FactoryError::InvalidReorder {
                    reason: format!("milestone '{id}' listed more than once"),
                });
            }
            if !self.contains(id) {
                return Err(FactoryError::InvalidReorder {
                    reason: format!("unknown milestone '{id}'"),
                });
            }
        }

        let mut by_id: HashMap<String, Milestone> = self
            .milestones
            .drain(..)
            .map(|m| (m.id.clone(), m))
            .collect();
        self.milestones = ids
            .iter()
            .filter_map(|id| by_id.remove(id.as_ref()))
            .collect();
        Ok(())
    }

    /// Moves the milestone at `from` to index `to`, shifting the others.
    /// Returns `false` when the move is a no-op.
    pub fn move_to(&mut self, from: usize, to: usize) -> Result<bool> {
        let len = self.milestones.len();
        if from >= len || to >= len {
            return Err(FactoryError::InvalidReorder {
                reason: format!("index out of range for a plan of {len} milestones"),
            });
        }
        if from == to {
            return Ok(false);
        }
        let moved = self.milestones.remove(from);
        self.milestones.insert(to, moved);
        Ok(true)
    }

    /// Sets a milestone's status without any dependency checks and returns
    /// the previous status.
    pub fn set_status(&mut self, id: &str, status: MilestoneStatus) -> Result<MilestoneStatus> {
        let milestone = self
            .milestones
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| FactoryError::MilestoneNotFound { id: id.to_string() })?;
        Ok(std::mem::replace(&mut milestone.status, status))
    }

    /// Generates an ID for a manually added milestone.
    pub fn generate_id(&self, unix_millis: i64) -> String {
        self.unique_id(&format!("step-{unix_millis}"))
    }

    /// Checks every invariant of the plan.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for milestone in &self.milestones {
            if !seen.insert(milestone.id.as_str()) {
                return Err(FactoryError::DuplicateMilestone {
                    id: milestone.id.clone(),
                });
            }
        }
        for milestone in &self.milestones {
            self.check_dependencies(milestone)?;
        }
        match deps::find_cycle(&self.milestones) {
            Some(id) => Err(FactoryError::CyclicDependency { id }),
            None => Ok(()),
        }
    }

    /// Builds a plan from planning-capability output.
    ///
    /// Every milestone starts `pending`. Empty IDs are numbered by position,
    /// duplicate IDs get a numeric suffix, and dependencies that are unknown,
    /// self-referencing or would close a cycle are dropped.
    pub fn from_drafts(drafts: Vec<PlanDraft>) -> Plan {
        let mut plan = Plan::new();
        for (index, draft) in drafts.into_iter().enumerate() {
            let base = if draft.id.trim().is_empty() {
                format!("step-{}", index + 1)
            } else {
                draft.id.trim().to_string()
            };
            let id = plan.unique_id(&base);
            if id != base {
                warn!("Renamed duplicate milestone id '{base}' to '{id}'");
            }
            plan.milestones.push(Milestone {
                id,
                title: draft.title,
                description: draft.description,
                dependencies: dedup(draft.dependencies),
                status: MilestoneStatus::Pending,
            });
        }

        let known: HashSet<String> = plan.milestones.iter().map(|m| m.id.clone()).collect();
        let mut kept: Vec<Vec<String>> = Vec::with_capacity(plan.len());
        {
            let mut graph = petgraph::graphmap::DiGraphMap::<&str, ()>::new();
            for milestone in &plan.milestones {
                graph.add_node(milestone.id.as_str());
            }
            for milestone in &plan.milestones {
                let mut accepted = Vec::new();
                for dep in &milestone.dependencies {
                    if !known.contains(dep) || deps::closes_cycle(&graph, dep, &milestone.id) {
                        warn!("Dropped dependency '{}' of milestone '{}'", dep, milestone.id);
                        continue;
                    }
                    graph.add_edge(dep.as_str(), milestone.id.as_str(), ());
                    accepted.push(dep.clone());
                }
                kept.push(accepted);
            }
        }
        for (milestone, accepted) in plan.milestones.iter_mut().zip(kept) {
            milestone.dependencies = accepted;
        }
        plan
    }

    fn unique_id(&self, base: &str) -> String {
        if !self.contains(base) {
            return base.to_string();
        }
        (2..)
            .map(|n| format!("{base}-{n}"))
            .find(|candidate| !self.contains(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    fn check_fields(&self, milestone: &Milestone) -> Result<()> {
        if milestone.title.trim().is_empty() {
            return Err(FactoryError::invalid_input("title").with_reason("must not be empty"));
        }
        Ok(())
    }

    fn check_dependencies(&self, milestone: &Milestone) -> Result<()> {
        for dep in &milestone.dependencies {
            if dep == &milestone.id {
                return Err(FactoryError::InvalidDependency {
                    id: milestone.id.clone(),
                    dependency: dep.clone(),
                    reason: "a milestone cannot depend on itself".to_string(),
                });
            }
            if !self.contains(dep) {
                return Err(FactoryError::InvalidDependency {
                    id: milestone.id.clone(),
                    dependency: dep.clone(),
                    reason: "no such milestone".to_string(),
                });
            }
        }
        Ok(())
    }
}

fn dedup(ids: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}
