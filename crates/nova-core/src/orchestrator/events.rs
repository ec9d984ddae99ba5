//! Change notifications published by the orchestrator.
//!
//! Front ends subscribe to keep their views (and the layout engine) in step
//! with the project state. Delivery is fire-and-forget: with no subscribers
//! the event is dropped, and a slow subscriber loses the oldest events.

use tokio::sync::broadcast;

use crate::models::{LogEntry, MilestoneStatus, ProjectStatus};

/// Default channel capacity (events)
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Something observable changed in the project state.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectEvent {
    StatusChanged(ProjectStatus),
    /// The plan was edited, undone, redone or regenerated
    PlanChanged,
    MilestoneStatusChanged {
        id: String,
        status: MilestoneStatus,
    },
    FilesAdded {
        count: usize,
    },
    VisualAdded {
        title: String,
    },
    Logged(LogEntry),
    HistoryChanged {
        can_undo: bool,
        can_redo: bool,
    },
    /// The project was cleared
    Reset,
}

impl ProjectEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            ProjectEvent::StatusChanged(_) => "status_changed",
            ProjectEvent::PlanChanged => "plan_changed",
            ProjectEvent::MilestoneStatusChanged { .. } => "milestone_status_changed",
            ProjectEvent::FilesAdded { .. } => "files_added",
            ProjectEvent::VisualAdded { .. } => "visual_added",
            ProjectEvent::Logged(_) => "logged",
            ProjectEvent::HistoryChanged { .. } => "history_changed",
            ProjectEvent::Reset => "reset",
        }
    }

    /// Whether the event changes row geometry or connector styling.
    pub fn affects_layout(&self) -> bool {
        matches!(
            self,
            ProjectEvent::PlanChanged
                | ProjectEvent::MilestoneStatusChanged { .. }
                | ProjectEvent::Reset
        )
    }
}

/// Broadcast sender wrapper.
#[derive(Debug, Clone)]
pub(crate) struct EventBus {
    tx: broadcast::Sender<ProjectEvent>,
}

impl EventBus {
    pub(crate) fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub(crate) fn emit(&self, event: ProjectEvent) {
        // No subscribers is fine
        let _ = self.tx.send(event);
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<ProjectEvent> {
        self.tx.subscribe()
    }
}
