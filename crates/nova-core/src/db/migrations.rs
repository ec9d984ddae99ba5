//! Database schema initialization and migrations.

use crate::error::{DatabaseResultExt, Result};

impl super::Database {
    /// Initializes the database schema using the embedded SQL file.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;

        self.apply_migrations()?;

        Ok(())
    }

    /// Apply database migrations for existing databases
    fn apply_migrations(&self) -> Result<()> {
        // Sessions written before undo history was persisted lack the column
        let has_history_column: bool = self
            .connection
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('sessions') WHERE name = 'history'",
                [],
                |row| row.get(0),
            )
            .map(|count: i64| count > 0)
            .unwrap_or(false);

        if !has_history_column {
            self.connection
                .execute(
                    r#"ALTER TABLE sessions ADD COLUMN history TEXT NOT NULL DEFAULT '{"past":[],"future":[]}'"#,
                    [],
                )
                .db_context("Failed to add history column to sessions table")?;
        }

        Ok(())
    }
}
