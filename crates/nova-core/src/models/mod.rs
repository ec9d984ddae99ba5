//! Data models for the factory's project state.
//!
//! This module contains the core domain models: milestones and the ordered
//! plan they form, generated files, the log stream, rendered visuals and the
//! [`ProjectState`] aggregate that ties them together and is persisted by the
//! session store. Display implementations for these models live in
//! [`crate::display::models`] to keep data structures separate from
//! presentation.
//!
//! # Serialization
//!
//! All models derive serde traits and keep the field names of the persisted
//! blob stable: statuses serialize in lower case (milestones, files, log
//! severity) or upper case (project status), timestamps as RFC 3339 strings.
//!
//! # Examples
//!
//! ```rust
//! use nova_core::models::{Milestone, MilestoneStatus, Plan};
//!
//! let plan = Plan::from(vec![
//!     Milestone::new("a", "Scaffold").with_status(MilestoneStatus::Done),
//!     Milestone::new("b", "Wire API").with_dependencies(["a"]),
//! ]);
//! assert_eq!(plan.completed(), 1);
//! assert_eq!(plan.next_pending(), Some(1));
//! println!("{}", plan); // Markdown roadmap with status icons
//! ```

pub mod artifact;
pub mod log;
pub mod milestone;
pub mod plan;
pub mod project;
pub mod status;
pub mod visual;

#[cfg(test)]
mod tests;

pub use artifact::{FileKind, ProjectFile};
pub use log::{agent, LogEntry, LogStream, Severity};
pub use milestone::Milestone;
pub use plan::Plan;
pub use project::{ProjectState, View};
pub use status::{MilestoneStatus, ProjectStatus};
pub use visual::{Visual, VisualKind};
