//! Builder for creating and configuring Orchestrator instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::task;

use super::{Orchestrator, Session, SessionStore};
use crate::{
    capability::Capabilities,
    config::DEFAULT_SESSION_KEY,
    db::Database,
    error::{FactoryError, Result},
};

/// Builder for creating and configuring Orchestrator instances.
#[derive(Clone)]
pub struct OrchestratorBuilder {
    database_path: Option<PathBuf>,
    session_key: String,
    capabilities: Option<Arc<dyn Capabilities>>,
    persistent: bool,
}

impl OrchestratorBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            database_path: None,
            session_key: DEFAULT_SESSION_KEY.to_string(),
            capabilities: None,
            persistent: true,
        }
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/nova/nova.db` or `~/.local/share/nova/nova.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Sets the storage key the session is persisted under.
    pub fn with_session_key(mut self, key: impl Into<String>) -> Self {
        self.session_key = key.into();
        self
    }

    /// Sets the capabilities used for planning and execution.
    pub fn with_capabilities(mut self, capabilities: Arc<dyn Capabilities>) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    /// Keeps the session in memory only.
    pub fn in_memory(mut self) -> Self {
        self.persistent = false;
        self
    }

    /// Builds the orchestrator, restoring the stored session if there is one.
    ///
    /// # Errors
    ///
    /// Returns `FactoryError::FileSystem` if the database directory cannot be
    /// created, `FactoryError::Database` if database initialization fails
    pub async fn build(self) -> Result<Orchestrator> {
        if !self.persistent {
            return Ok(Orchestrator::new(Session::default(), self.capabilities, None));
        }

        let db_path = if let Some(path) = self.database_path {
            path
        } else {
            Self::default_database_path()?
        };

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| FactoryError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&db_path_clone)?;
            Ok::<(), FactoryError>(())
        })
        .await
        .map_err(|e| FactoryError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        let store = SessionStore::new(db_path, self.session_key);
        let session = store.restore().await;
        Ok(Orchestrator::new(session, self.capabilities, Some(store)))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    pub fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("nova")
            .place_data_file("nova.db")
            .map_err(|e| FactoryError::XdgDirectory(e.to_string()))
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
