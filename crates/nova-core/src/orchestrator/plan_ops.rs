//! History-wrapped plan edits for the Orchestrator.
//!
//! Each edit is applied to a copy of the plan first; only when it succeeds is
//! the pre-edit plan pushed onto the undo stack and the copy made current.
//! A rejected edit therefore leaves both the plan and the history untouched.

use jiff::Timestamp;
use log::info;

use super::{Orchestrator, ProjectEvent};
use crate::{
    error::Result,
    history::{self, HistoryCommand, KeyChord},
    models::{agent, LogEntry, Milestone, MilestoneStatus, Plan, Severity},
    params::{MoveMilestone, NewMilestone, SetStatus},
};

/// Log line written for a successful edit.
struct EditLog {
    message: String,
    severity: Severity,
}

impl EditLog {
    fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Info,
        }
    }

    fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Orchestrator {
    /// Appends a milestone with status `pending`. When no ID is given one is
    /// generated from the clock.
    pub async fn add_milestone(&self, params: &NewMilestone) -> Result<Milestone> {
        let requested = params
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(String::from);

        self.edit_plan("add a milestone", |plan| {
            let id = requested
                .clone()
                .unwrap_or_else(|| plan.generate_id(Timestamp::now().as_millisecond()));
            let milestone = Milestone::new(id, params.title.trim())
                .with_description(params.description.clone())
                .with_dependencies(params.dependencies.iter().cloned());
            plan.add(milestone.clone())?;
            let added = plan.get(&milestone.id).cloned().unwrap_or(milestone);
            let log = EditLog::info(format!("Injected custom milestone: {}", added.title))
                .with_severity(Severity::Success);
            Ok((added, log))
        })
        .await
    }

    /// Replaces the milestone with the same ID wholesale. Returns the
    /// previous version.
    pub async fn edit_milestone(&self, updated: Milestone) -> Result<Milestone> {
        let title = updated.title.clone();
        self.edit_plan("edit a milestone", move |plan| {
            let previous = plan.replace(updated)?;
            Ok((previous, EditLog::info(format!("Modified architecture for: {title}"))))
        })
        .await
    }

    /// Removes one milestone and every reference to it.
    pub async fn delete_milestone(&self, id: &str) -> Result<Milestone> {
        self.edit_plan("delete a milestone", |plan| {
            let removed = plan.remove(id)?;
            let log = EditLog::info(format!("Removed node {} from workflow.", removed.id))
                .with_severity(Severity::Warning);
            Ok((removed, log))
        })
        .await
    }

    /// Replaces the execution order with a permutation of the current IDs.
    pub async fn reorder_milestones(&self, ids: &[String]) -> Result<()> {
        self.edit_plan("reorder the plan", |plan| {
            plan.reorder(ids)?;
            Ok(((), EditLog::info("Re-sequenced execution priorities.")))
        })
        .await
    }

    /// Moves one milestone to a new index. A move onto its own index changes
    /// nothing and records no history.
    pub async fn move_milestone(&self, params: &MoveMilestone) -> Result<bool> {
        if params.from == params.to {
            let session = self.session.lock().await;
            self.ensure_idle("move a milestone")?;
            if params.from < session.state.plan.len() {
                return Ok(false);
            }
        }
        self.edit_plan("move a milestone", |plan| {
            let moved = plan.move_to(params.from, params.to)?;
            Ok((moved, EditLog::info("Re-sequenced execution priorities.")))
        })
        .await
    }

    /// Manual status override. Dependencies are not checked.
    pub async fn set_milestone_status(&self, params: &SetStatus) -> Result<MilestoneStatus> {
        let status = params.status;
        let previous = self
            .edit_plan("change a milestone status", |plan| {
                let previous = plan.set_status(&params.id, status)?;
                let log = EditLog::info(format!("Manual status update [{}]: {}", params.id, status.as_str()));
                Ok((previous, log))
            })
            .await?;
        self.emit(ProjectEvent::MilestoneStatusChanged {
            id: params.id.clone(),
            status,
        });
        Ok(previous)
    }

    /// Restores the previous plan snapshot. Returns `false` when there is
    /// nothing to undo.
    pub async fn undo(&self) -> Result<bool> {
        let (entry, can_undo, can_redo) = {
            let mut session = self.session.lock().await;
            self.ensure_idle("undo")?;
            let current = session.state.plan.clone();
            let Some(previous) = session.history.undo(&current) else {
                return Ok(false);
            };
            session.state.plan = previous;
            let entry = session.state.log(
                agent::SYSTEM,
                "Undo successful: Restored architecture snapshot.",
                Severity::Info,
            );
            (entry, session.history.can_undo(), session.history.can_redo())
        };
        self.after_edit(entry, can_undo, can_redo).await?;
        Ok(true)
    }

    /// Re-applies the most recently undone plan. Returns `false` when there
    /// is nothing to redo.
    pub async fn redo(&self) -> Result<bool> {
        let (entry, can_undo, can_redo) = {
            let mut session = self.session.lock().await;
            self.ensure_idle("redo")?;
            let current = session.state.plan.clone();
            let Some(next) = session.history.redo(&current) else {
                return Ok(false);
            };
            session.state.plan = next;
            let entry = session.state.log(
                agent::SYSTEM,
                "Redo successful: Advanced to next architecture state.",
                Severity::Info,
            );
            (entry, session.history.can_undo(), session.history.can_redo())
        };
        self.after_edit(entry, can_undo, can_redo).await?;
        Ok(true)
    }

    /// Runs the history command bound to `chord`, if any. Returns whether
    /// the plan changed.
    pub async fn handle_shortcut(&self, chord: KeyChord) -> Result<bool> {
        match history::shortcut(chord) {
            Some(HistoryCommand::Undo) => self.undo().await,
            Some(HistoryCommand::Redo) => self.redo().await,
            None => Ok(false),
        }
    }

    /// Applies `edit` to a copy of the plan and commits it with a history
    /// snapshot, a user log entry, change events and a persist.
    async fn edit_plan<T, F>(&self, operation: &str, edit: F) -> Result<T>
    where
        F: FnOnce(&mut Plan) -> Result<(T, EditLog)>,
    {
        let (value, entry, can_undo, can_redo) = {
            let mut session = self.session.lock().await;
            self.ensure_idle(operation)?;
            let mut candidate = session.state.plan.clone();
            let (value, log) = edit(&mut candidate)?;

            let before = std::mem::replace(&mut session.state.plan, candidate);
            session.history.snapshot_before_change(&before);
            let entry = session.state.log(agent::USER, log.message, log.severity);
            (value, entry, session.history.can_undo(), session.history.can_redo())
        };
        info!("{}", entry.message);
        self.after_edit(entry, can_undo, can_redo).await?;
        Ok(value)
    }

    async fn after_edit(&self, entry: LogEntry, can_undo: bool, can_redo: bool) -> Result<()> {
        self.emit(ProjectEvent::PlanChanged);
        self.emit(ProjectEvent::Logged(entry));
        self.emit(ProjectEvent::HistoryChanged { can_undo, can_redo });
        self.persist().await
    }
}
