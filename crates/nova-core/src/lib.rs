//! Core library for the Nova software factory.
//!
//! Nova turns a natural-language prompt into a plan of milestones, then
//! drives each milestone through code synthesis, validation with one
//! self-correction round, and a final design pass. This crate owns that
//! pipeline and everything around it: the plan graph and its editing
//! operations, undo/redo history, the roadmap layout with its dependency
//! connectors, session persistence, and the capability clients.
//!
//! # Architecture
//!
//! - **Models** ([`models`]): the project state aggregate and its parts
//! - **Plan graph** ([`graph`]) and **history** ([`history`]): validated
//!   edits and plan snapshots
//! - **Orchestrator** ([`orchestrator`]): the single owner of the state;
//!   every mutation, run and persist goes through it
//! - **Capabilities** ([`capability`]): planning, synthesis, validation and
//!   design behind one async trait
//! - **Layout** ([`layout`]): row geometry, connector curves, SVG rendering
//! - **Display** ([`display`]): Markdown formatting for terminal output
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use nova_core::{
//!     capability::{PlanDraft, ScriptedCapabilities},
//!     params::GeneratePlan,
//!     OrchestratorBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let capabilities = ScriptedCapabilities::new().with_plan(vec![
//!     PlanDraft::new("a", "Scaffold the app"),
//!     PlanDraft::new("b", "Wire the API").with_dependencies(["a"]),
//! ]);
//!
//! let orchestrator = OrchestratorBuilder::new()
//!     .with_database_path(Some("nova.db"))
//!     .with_capabilities(Arc::new(capabilities))
//!     .build()
//!     .await?;
//!
//! let plan = orchestrator
//!     .generate_plan(&GeneratePlan {
//!         prompt: "A todo app".to_string(),
//!         images: vec![],
//!     })
//!     .await?;
//! println!("{}", plan);
//!
//! let report = orchestrator.execute().await?;
//! println!("{}", report);
//! # Ok(())
//! # }
//! ```

pub mod capability;
pub mod config;
pub mod db;
pub mod display;
pub mod error;
pub mod graph;
pub mod history;
pub mod layout;
pub mod models;
pub mod orchestrator;
pub mod params;
pub mod preview;

// Re-export commonly used types
pub use capability::{Capabilities, CapabilityError, GeminiCapabilities, ScriptedCapabilities};
pub use config::GeminiConfig;
pub use db::Database;
pub use display::{
    CreateResult, DeleteResult, Files, LocalDateTime, Logs, OperationStatus, StatusBar,
    UpdateResult, Visuals,
};
pub use error::{FactoryError, Result};
pub use history::{History, HistoryCommand, KeyChord};
pub use layout::{LayoutConfig, LayoutEngine};
pub use models::{
    LogEntry, Milestone, MilestoneStatus, Plan, ProjectFile, ProjectState, ProjectStatus,
    Severity, Visual,
};
pub use orchestrator::{Orchestrator, OrchestratorBuilder, ProjectEvent, RunReport};
pub use params::{GeneratePlan, MoveMilestone, NewMilestone, SetStatus};
