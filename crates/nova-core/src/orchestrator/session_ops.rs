//! Session persistence for the Orchestrator.

use std::path::{Path, PathBuf};

use log::{debug, warn};
use tokio::task;

use super::{Orchestrator, ProjectEvent, Session};
use crate::{
    db::{Database, StoredSession},
    error::{FactoryError, Result},
    history::History,
    models::ProjectState,
};

/// Location of a persisted session: a database file and a storage key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStore {
    db_path: PathBuf,
    key: String,
}

impl SessionStore {
    pub fn new(db_path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            key: key.into(),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the stored session, if any.
    pub async fn load(&self) -> Result<Option<StoredSession>> {
        let db_path = self.db_path.clone();
        let key = self.key.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.load_session(&key)
        })
        .await
        .map_err(|e| FactoryError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Writes the session, replacing what was stored.
    pub async fn save(&self, state: ProjectState, history: History) -> Result<()> {
        let db_path = self.db_path.clone();
        let key = self.key.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.save_session(&key, &state, &history)
        })
        .await
        .map_err(|e| FactoryError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Removes the stored session.
    pub async fn delete(&self) -> Result<bool> {
        let db_path = self.db_path.clone();
        let key = self.key.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.delete_session(&key)
        })
        .await
        .map_err(|e| FactoryError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Loads the stored session, falling back to a fresh one when nothing is
    /// stored or the stored data cannot be read.
    pub(crate) async fn restore(&self) -> Session {
        match self.load().await {
            Ok(Some(stored)) => {
                debug!("Restored session '{}' saved at {}", self.key, stored.updated_at);
                Session {
                    state: stored.state,
                    history: stored.history,
                }
            }
            Ok(None) => Session::default(),
            Err(e) => {
                warn!("Failed to restore session '{}': {e}", self.key);
                Session::default()
            }
        }
    }
}

impl Orchestrator {
    /// Persists the current state and history.
    ///
    /// A blank project (no plan, no files, no logs) is not written, so an
    /// untouched session never overwrites a saved one.
    pub async fn persist(&self) -> Result<()> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        let (state, history) = {
            let session = self.session.lock().await;
            if session.state.is_blank() {
                return Ok(());
            }
            (session.state.clone(), session.history.clone())
        };
        store.save(state, history).await
    }

    /// Persists, logging instead of failing. Used between pipeline steps so a
    /// storage hiccup does not abort a run.
    pub(crate) async fn persist_or_warn(&self) {
        if let Err(e) = self.persist().await {
            warn!("Failed to persist session: {e}");
        }
    }

    /// Clears the project: fresh state, empty history, stored session
    /// deleted.
    pub async fn reset(&self) -> Result<()> {
        {
            let mut session = self.session.lock().await;
            self.ensure_idle("reset the project")?;
            *session = Session::default();
        }
        if let Some(store) = &self.store {
            store.delete().await?;
        }
        self.emit(ProjectEvent::Reset);
        self.emit(ProjectEvent::HistoryChanged {
            can_undo: false,
            can_redo: false,
        });
        Ok(())
    }
}
