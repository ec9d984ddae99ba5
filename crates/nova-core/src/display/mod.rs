//! Display formatting functions and result types.
//!
//! Domain models implement `Display` directly (see [`models`]); collections
//! and operation outcomes get newtype wrappers so a front end can print them
//! without knowing their layout. Everything renders as Markdown, which the
//! CLI hands to a terminal skin.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │    Wrappers     │    │   Formatted     │
//! │ (Plan, Files..) │───▶│ (Logs, Results) │───▶│    Markdown     │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: file listings, the log feed, visuals
//! - [`results`]: outcomes of milestone edits
//! - [`status`]: the status bar and short confirmation lines
//! - [`datetime`]: local time formatting
//! - [`models`]: Display implementations for domain models
//!
//! ## Usage Examples
//!
//! ```rust
//! use nova_core::{
//!     display::{CreateResult, OperationStatus},
//!     models::Milestone,
//! };
//!
//! let milestone = Milestone::new("api", "Build the API");
//! let output = CreateResult::new(milestone).to_string();
//! assert!(output.contains("Added milestone 'api'"));
//!
//! let nothing = OperationStatus::warning("Nothing to undo");
//! assert_eq!(nothing.to_string(), "Warning: Nothing to undo\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{Files, Logs, Visuals};
pub use datetime::{LocalDateTime, LocalTime};
pub use results::{CreateResult, DeleteResult, UpdateResult};
pub use status::{OperationStatus, StatusBar};
