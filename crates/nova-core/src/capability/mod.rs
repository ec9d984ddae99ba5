//! External capabilities the factory delegates to.
//!
//! Planning, code synthesis, validation and design are opaque, side-effecting
//! calls. The orchestrator only sees the [`Capabilities`] trait; the hosted
//! model client and the scripted test double are interchangeable behind it.

use std::fmt;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Milestone, ProjectFile};

pub mod gemini;
pub mod response;
pub mod scripted;

pub use gemini::GeminiCapabilities;
pub use scripted::ScriptedCapabilities;

/// A milestone as proposed by the planning capability, before sanitizing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PlanDraft {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl PlanDraft {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }
}

/// Outcome of validating a batch of candidate artifacts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ValidationReport {
    pub passed: bool,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn passed(feedback: impl Into<String>) -> Self {
        Self {
            passed: true,
            feedback: feedback.into(),
            errors: Vec::new(),
        }
    }

    pub fn failed(feedback: impl Into<String>) -> Self {
        Self {
            passed: false,
            feedback: feedback.into(),
            errors: Vec::new(),
        }
    }

    pub fn with_errors<I, S>(mut self, errors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.errors = errors.into_iter().map(Into::into).collect();
        self
    }

    /// Feedback text handed to the corrective synthesis attempt.
    pub fn correction_notes(&self) -> String {
        if self.errors.is_empty() {
            self.feedback.clone()
        } else {
            let mut notes = self.feedback.clone();
            for error in &self.errors {
                notes.push_str("\n- ");
                notes.push_str(error);
            }
            notes
        }
    }
}

/// Which capability a call belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Planning,
    Synthesis,
    Validation,
    Design,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Planning => "planning",
            Stage::Synthesis => "synthesis",
            Stage::Validation => "validation",
            Stage::Design => "design",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by capability implementations.
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("No API key configured (set GEMINI_API_KEY or API_KEY)")]
    MissingApiKey,

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CapabilityError {
    /// Whether the call may succeed if repeated.
    pub fn is_retryable(&self) -> bool {
        match self {
            CapabilityError::Api { status, .. } => *status == 429 || *status >= 500,
            CapabilityError::Network(_) => true,
            CapabilityError::InvalidResponse(_)
            | CapabilityError::MissingApiKey
            | CapabilityError::Json(_) => false,
        }
    }
}

/// The four opaque operations the pipeline is built from.
#[async_trait]
pub trait Capabilities: Send + Sync {
    /// Breaks a prompt (plus optional base64 images) into milestones.
    /// A malformed or empty response yields an empty list.
    async fn plan(&self, prompt: &str, images: &[String]) -> Result<Vec<PlanDraft>, CapabilityError>;

    /// Produces candidate artifacts for one milestone. `context` holds every
    /// artifact accumulated so far.
    async fn synthesize(
        &self,
        milestone: &Milestone,
        context: &str,
    ) -> Result<Vec<ProjectFile>, CapabilityError>;

    /// Reviews candidate artifacts.
    async fn validate(&self, files: &[ProjectFile]) -> Result<ValidationReport, CapabilityError>;

    /// Produces raw diagram markup for the finished plan.
    async fn design(&self, prompt: &str, plan: &[Milestone]) -> Result<Option<String>, CapabilityError>;
}
