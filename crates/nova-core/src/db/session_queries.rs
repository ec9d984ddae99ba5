//! Session load, save and delete by storage key.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension};

use crate::{
    error::{DatabaseResultExt, FactoryError, Result},
    history::History,
    models::ProjectState,
};

const SELECT_SESSION_SQL: &str = "SELECT state, history, updated_at FROM sessions WHERE key = ?1";
const UPSERT_SESSION_SQL: &str = "INSERT INTO sessions (key, state, history, created_at, updated_at) \
     VALUES (?1, ?2, ?3, ?4, ?4) \
     ON CONFLICT(key) DO UPDATE SET state = excluded.state, history = excluded.history, \
     updated_at = excluded.updated_at";
const DELETE_SESSION_SQL: &str = "DELETE FROM sessions WHERE key = ?1";
const LIST_SESSION_KEYS_SQL: &str = "SELECT key FROM sessions ORDER BY updated_at DESC";

/// A session as read back from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSession {
    pub state: ProjectState,
    pub history: History,
    pub updated_at: Timestamp,
}

impl super::Database {
    /// Loads the session stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing is stored and an error when the stored
    /// JSON cannot be decoded.
    pub fn load_session(&self, key: &str) -> Result<Option<StoredSession>> {
        let row: Option<(String, String, String)> = self
            .connection
            .query_row(SELECT_SESSION_SQL, params![key], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })
            .optional()
            .db_context("Failed to query session")?;

        let Some((state_json, history_json, updated_at)) = row else {
            return Ok(None);
        };

        let state: ProjectState = serde_json::from_str(&state_json)?;
        let history: History = serde_json::from_str(&history_json)?;
        let updated_at = updated_at.parse::<Timestamp>().map_err(|_| FactoryError::InvalidInput {
            field: "updated_at".to_string(),
            reason: format!("'{updated_at}' is not a valid timestamp"),
        })?;

        Ok(Some(StoredSession {
            state,
            history,
            updated_at,
        }))
    }

    /// Writes the session under `key`, replacing any previous value.
    pub fn save_session(&mut self, key: &str, state: &ProjectState, history: &History) -> Result<()> {
        let state_json = serde_json::to_string(state)?;
        let history_json = serde_json::to_string(history)?;
        let now = Timestamp::now().to_string();

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;
        tx.execute(UPSERT_SESSION_SQL, params![key, state_json, history_json, now])
            .db_context("Failed to save session")?;
        tx.commit().db_context("Failed to commit transaction")?;

        Ok(())
    }

    /// Deletes the session under `key`. Returns whether a row was removed.
    pub fn delete_session(&mut self, key: &str) -> Result<bool> {
        let removed = self
            .connection
            .execute(DELETE_SESSION_SQL, params![key])
            .db_context("Failed to delete session")?;
        Ok(removed > 0)
    }

    /// Storage keys of every saved session, most recently updated first.
    pub fn session_keys(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .connection
            .prepare(LIST_SESSION_KEYS_SQL)
            .db_context("Failed to prepare query")?;
        let keys = stmt
            .query_map([], |row| row.get(0))
            .db_context("Failed to list sessions")?
            .collect::<std::result::Result<Vec<String>, _>>()
            .db_context("Failed to read session key")?;
        Ok(keys)
    }

    /// Stores raw text under `key`, bypassing serialization. Used to simulate
    /// corrupted sessions.
    #[cfg(test)]
    pub(crate) fn save_raw_session(&mut self, key: &str, state: &str) -> Result<()> {
        let now = Timestamp::now().to_string();
        self.connection
            .execute(
                UPSERT_SESSION_SQL,
                params![key, state, r#"{"past":[],"future":[]}"#, now],
            )
            .db_context("Failed to save session")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::Database;
    use crate::{
        history::History,
        models::{Milestone, MilestoneStatus, Plan, ProjectFile, ProjectState, Severity},
    };

    fn create_test_state() -> ProjectState {
        let mut state = ProjectState {
            prompt: "todo app".to_string(),
            plan: Plan::from(vec![
                Milestone::new("a", "Setup").with_status(MilestoneStatus::Done),
                Milestone::new("b", "Build").with_dependencies(["a"]),
            ]),
            files: vec![ProjectFile::new("src/a.ts", "export {}")],
            ..Default::default()
        };
        state.log("Planner", "Plan created", Severity::Success);
        state
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let mut db = Database::in_memory().expect("Failed to open database");
        let state = create_test_state();
        let mut history = History::new();
        history.snapshot_before_change(&Plan::new());

        db.save_session("k", &state, &history).expect("Failed to save");
        let loaded = db.load_session("k").expect("Failed to load").expect("session exists");

        assert_eq!(loaded.state, state);
        assert_eq!(loaded.history, history);
        assert_eq!(
            loaded.state.logs.entries()[0].timestamp,
            state.logs.entries()[0].timestamp
        );
    }

    #[test]
    fn test_missing_session() {
        let db = Database::in_memory().unwrap();
        assert!(db.load_session("nope").unwrap().is_none());
    }

    #[test]
    fn test_save_overwrites() {
        let mut db = Database::in_memory().unwrap();
        let mut state = create_test_state();
        db.save_session("k", &state, &History::new()).unwrap();
        state.prompt = "changed".to_string();
        db.save_session("k", &state, &History::new()).unwrap();

        assert_eq!(db.load_session("k").unwrap().unwrap().state.prompt, "changed");
        assert_eq!(db.session_keys().unwrap(), vec!["k"]);
    }

    #[test]
    fn test_delete_session() {
        let mut db = Database::in_memory().unwrap();
        db.save_session("k", &create_test_state(), &History::new()).unwrap();
        assert!(db.delete_session("k").unwrap());
        assert!(!db.delete_session("k").unwrap());
        assert!(db.load_session("k").unwrap().is_none());
    }

    #[test]
    fn test_corrupt_session_is_an_error() {
        let mut db = Database::in_memory().unwrap();
        db.save_raw_session("k", "{not json").unwrap();
        assert!(db.load_session("k").is_err());
    }
}
