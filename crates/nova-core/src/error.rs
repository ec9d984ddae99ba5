//! Error types for the factory library.

use std::path::PathBuf;

use thiserror::Error;

use crate::capability::{CapabilityError, Stage};

/// Comprehensive error type for all factory operations.
#[derive(Error, Debug)]
pub enum FactoryError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Milestone not found for the given ID
    #[error("Milestone '{id}' not found")]
    MilestoneNotFound { id: String },
    /// A milestone with the same ID already exists in the plan
    #[error("Milestone '{id}' already exists")]
    DuplicateMilestone { id: String },
    /// A dependency references a missing milestone or the milestone itself
    #[error("Milestone '{id}' cannot depend on '{dependency}': {reason}")]
    InvalidDependency {
        id: String,
        dependency: String,
        reason: String,
    },
    /// Applying the change would introduce a dependency cycle
    #[error("Dependencies of '{id}' would form a cycle")]
    CyclicDependency { id: String },
    /// A reorder request is not a permutation of the current plan
    #[error("Invalid reorder: {reason}")]
    InvalidReorder { reason: String },
    /// A run or planning cycle is in progress
    #[error("Cannot {operation} while the pipeline is running")]
    Busy { operation: String },
    /// An external capability call failed
    #[error("{stage} capability failed: {source}")]
    Capability {
        stage: Stage,
        #[source]
        source: CapabilityError,
    },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> FactoryError {
        FactoryError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl FactoryError {
    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates a database error with a context message.
    pub fn database(message: impl Into<String>, source: rusqlite::Error) -> Self {
        Self::Database {
            message: message.into(),
            source,
        }
    }

    /// Creates a busy error for the named operation.
    pub fn busy(operation: impl Into<String>) -> Self {
        Self::Busy {
            operation: operation.into(),
        }
    }

    /// Wraps a capability failure with the stage it happened in.
    pub fn capability(stage: Stage, source: CapabilityError) -> Self {
        Self::Capability { stage, source }
    }

    /// Whether the error was raised because a run is in progress.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy { .. })
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| FactoryError::database(message, e))
    }
}

/// Result type alias for factory operations
pub type Result<T> = std::result::Result<T, FactoryError>;
