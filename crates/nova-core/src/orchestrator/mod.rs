//! The factory orchestrator: owner of the project state.
//!
//! [`Orchestrator`] is a cheaply cloneable handle around the single
//! [`ProjectState`] aggregate and its undo [`History`]. Every mutation goes
//! through it, is persisted to the session store, and is announced on a
//! broadcast channel of [`ProjectEvent`]s.
//!
//! ```text
//! ┌───────────────┐    ┌────────────────────┐    ┌──────────────┐
//! │   Front end   │───▶│    Orchestrator    │───▶│ SessionStore │
//! │ (CLI, tests)  │    │ plan_ops/execution │    │  (SQLite)    │
//! └───────────────┘    └─────────┬──────────┘    └──────────────┘
//!         ▲                      │
//!         │ ProjectEvent         ▼
//!         └──────────────  Capabilities
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: resolves the database path, restores the session
//! - [`plan_ops`]: history-wrapped plan edits, undo and redo
//! - [`execution`]: plan generation and the build pipeline
//! - [`session_ops`]: persistence and reset
//! - [`events`]: change notifications
//!
//! # Concurrency
//!
//! The state lives behind an async mutex that is never held across a
//! capability call. A processing flag, taken with compare-and-swap and
//! released by a drop guard, keeps a run or planning cycle exclusive; manual
//! edits, undo and redo fail with [`FactoryError::Busy`] while it is set.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use log::debug;
use tokio::sync::{broadcast, Mutex};

use crate::{
    capability::Capabilities,
    error::{FactoryError, Result},
    history::History,
    models::{LogEntry, ProjectState, Severity},
};

pub mod builder;
pub mod events;
pub mod execution;
pub mod plan_ops;
pub mod session_ops;


pub use builder::OrchestratorBuilder;
pub use events::ProjectEvent;
pub use execution::RunReport;
pub use session_ops::SessionStore;

/// State guarded by the orchestrator's lock.
#[derive(Debug, Clone, Default)]
pub(crate) struct Session {
    pub(crate) state: ProjectState,
    pub(crate) history: History,
}

/// Handle to the project state and the pipeline that drives it.
#[derive(Clone)]
pub struct Orchestrator {
    session: Arc<Mutex<Session>>,
    processing: Arc<AtomicBool>,
    capabilities: Option<Arc<dyn Capabilities>>,
    store: Option<SessionStore>,
    events: events::EventBus,
}

impl Orchestrator {
    pub(crate) fn new(
        session: Session,
        capabilities: Option<Arc<dyn Capabilities>>,
        store: Option<SessionStore>,
    ) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            processing: Arc::new(AtomicBool::new(false)),
            capabilities,
            store,
            events: events::EventBus::new(events::DEFAULT_CHANNEL_CAPACITY),
        }
    }

    /// Copy of the current project state.
    pub async fn state(&self) -> ProjectState {
        self.session.lock().await.state.clone()
    }

    pub async fn can_undo(&self) -> bool {
        self.session.lock().await.history.can_undo()
    }

    pub async fn can_redo(&self) -> bool {
        self.session.lock().await.history.can_redo()
    }

    /// Whether a run or planning cycle is in progress.
    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    /// Subscribes to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<ProjectEvent> {
        self.events.subscribe()
    }

    /// Storage key of the persisted session, if persistence is enabled.
    pub fn session_key(&self) -> Option<&str> {
        self.store.as_ref().map(SessionStore::key)
    }

    fn capabilities(&self) -> Result<Arc<dyn Capabilities>> {
        self.capabilities
            .clone()
            .ok_or_else(|| FactoryError::Configuration {
                message: "no capabilities configured".to_string(),
            })
    }

    /// Fails with `Busy` while a run or planning cycle holds the flag. Call
    /// with the session lock held; the flag is only raised under that lock.
    fn ensure_idle(&self, operation: &str) -> Result<()> {
        if self.is_processing() {
            debug!("Rejected '{operation}': pipeline is running");
            return Err(FactoryError::busy(operation));
        }
        Ok(())
    }

    /// Raises the processing flag under the session lock, so an edit that
    /// already holds the lock commits before the pipeline reads the plan.
    async fn start_processing(&self, operation: &str) -> Result<ProcessingGuard> {
        let _session = self.session.lock().await;
        ProcessingGuard::acquire(&self.processing, operation)
    }

    fn emit(&self, event: ProjectEvent) {
        self.events.emit(event);
    }

    /// Appends a log entry under the lock and publishes it.
    async fn log(&self, agent: &str, message: impl Into<String>, severity: Severity) -> LogEntry {
        let entry = self.session.lock().await.state.log(agent, message, severity);
        self.emit(ProjectEvent::Logged(entry.clone()));
        entry
    }
}

/// Holds the processing flag for the duration of a run.
struct ProcessingGuard {
    flag: Arc<AtomicBool>,
}

impl ProcessingGuard {
    fn acquire(flag: &Arc<AtomicBool>, operation: &str) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| FactoryError::busy(operation))?;
        Ok(Self {
            flag: Arc::clone(flag),
        })
    }
}

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
