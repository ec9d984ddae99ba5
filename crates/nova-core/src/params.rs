//! Parameter structures for factory operations.
//!
//! These structures are shared across interfaces (the CLI today, any other
//! front end tomorrow) without framework-specific derives. Interface layers
//! define their own argument types and convert into these with `From`:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Orchestrator
//! ```

use serde::{Deserialize, Serialize};

use crate::models::MilestoneStatus;

/// Parameters for manually adding a milestone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewMilestone {
    /// Explicit ID; generated from the clock when omitted
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// Parameters for a manual status override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetStatus {
    pub id: String,
    pub status: MilestoneStatus,
}

/// Drag-and-drop move of one milestone to a new index.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MoveMilestone {
    pub from: usize,
    pub to: usize,
}

/// Parameters for starting a new planning cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratePlan {
    pub prompt: String,
    /// Base64 JPEG payloads or `data:` URLs
    #[serde(default)]
    pub images: Vec<String>,
}
