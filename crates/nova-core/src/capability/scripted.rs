//! Scripted capabilities returning canned responses.
//!
//! Used by tests and offline demos. Every call is recorded so callers can
//! assert on the order of stages and on the context each call received.

use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use super::{CapabilityError, Capabilities, PlanDraft, Stage, ValidationReport};
use crate::models::{Milestone, ProjectFile};

/// A recorded capability call.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub stage: Stage,
    /// Milestone ID for synthesis, the prompt for planning and design, the
    /// comma-joined paths for validation
    pub subject: String,
    /// Context handed to synthesis; empty for other stages
    pub context: String,
}

#[derive(Default)]
struct Script {
    plan: Vec<PlanDraft>,
    files: HashMap<String, VecDeque<Vec<ProjectFile>>>,
    reports: VecDeque<ValidationReport>,
    design: Option<String>,
    failing_stages: HashMap<Stage, String>,
    failing_milestones: HashSet<String>,
    calls: Vec<Call>,
}

/// Capabilities whose responses are set up in advance.
///
/// Without a queued response, synthesis returns one file `src/<id>.ts` per
/// milestone and validation passes.
#[derive(Default)]
pub struct ScriptedCapabilities {
    script: Mutex<Script>,
    synthesis_gate: Option<Arc<Semaphore>>,
}

impl ScriptedCapabilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drafts returned by every planning call.
    pub fn with_plan(self, drafts: Vec<PlanDraft>) -> Self {
        self.lock().plan = drafts;
        self
    }

    /// Queues a synthesis response for one milestone. Queued responses are
    /// consumed in order.
    pub fn with_files(self, milestone_id: &str, files: Vec<ProjectFile>) -> Self {
        self.lock()
            .files
            .entry(milestone_id.to_string())
            .or_default()
            .push_back(files);
        self
    }

    /// Queues a validation report. Queued reports are consumed in order.
    pub fn with_report(self, report: ValidationReport) -> Self {
        self.lock().reports.push_back(report);
        self
    }

    pub fn with_design(self, markup: impl Into<String>) -> Self {
        self.lock().design = Some(markup.into());
        self
    }

    /// Makes every call of `stage` fail.
    pub fn failing(self, stage: Stage, message: impl Into<String>) -> Self {
        self.lock().failing_stages.insert(stage, message.into());
        self
    }

    /// Makes synthesis of one milestone fail.
    pub fn failing_synthesis_of(self, milestone_id: &str) -> Self {
        self.lock().failing_milestones.insert(milestone_id.to_string());
        self
    }

    /// Holds every synthesis call until a permit is available on `gate`.
    pub fn with_synthesis_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.synthesis_gate = Some(gate);
        self
    }

    /// Calls made so far, oldest first.
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Calls of one stage.
    pub fn calls_of(&self, stage: Stage) -> Vec<Call> {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.stage == stage)
            .cloned()
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, stage: Stage, subject: String, context: String) -> Result<(), CapabilityError> {
        let mut script = self.lock();
        script.calls.push(Call {
            stage,
            subject,
            context,
        });
        match script.failing_stages.get(&stage) {
            Some(message) => Err(CapabilityError::InvalidResponse(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Capabilities for ScriptedCapabilities {
    async fn plan(&self, prompt: &str, _images: &[String]) -> Result<Vec<PlanDraft>, CapabilityError> {
        self.record(Stage::Planning, prompt.to_string(), String::new())?;
        Ok(self.lock().plan.clone())
    }

    async fn synthesize(
        &self,
        milestone: &Milestone,
        context: &str,
    ) -> Result<Vec<ProjectFile>, CapabilityError> {
        if let Some(gate) = &self.synthesis_gate {
            gate.acquire()
                .await
                .map_err(|_| CapabilityError::InvalidResponse("synthesis gate closed".to_string()))?
                .forget();
        }
        self.record(Stage::Synthesis, milestone.id.clone(), context.to_string())?;

        let mut script = self.lock();
        if script.failing_milestones.contains(&milestone.id) {
            return Err(CapabilityError::Api {
                status: 500,
                message: format!("synthesis of '{}' failed", milestone.id),
            });
        }
        let queued = script
            .files
            .get_mut(&milestone.id)
            .and_then(|queue| queue.pop_front());
        Ok(queued.unwrap_or_else(|| {
            vec![ProjectFile::new(
                format!("src/{}.ts", milestone.id),
                format!("// {}\n", milestone.title),
            )]
        }))
    }

    async fn validate(&self, files: &[ProjectFile]) -> Result<ValidationReport, CapabilityError> {
        let paths = files
            .iter()
            .map(|f| f.path.as_str())
            .collect::<Vec<_>>()
            .join(",");
        self.record(Stage::Validation, paths, String::new())?;
        Ok(self
            .lock()
            .reports
            .pop_front()
            .unwrap_or_else(|| ValidationReport::passed("Looks good")))
    }

    async fn design(&self, prompt: &str, _plan: &[Milestone]) -> Result<Option<String>, CapabilityError> {
        self.record(Stage::Design, prompt.to_string(), String::new())?;
        Ok(self.lock().design.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_responses() {
        let caps = ScriptedCapabilities::new();
        let milestone = Milestone::new("api", "Build API");

        let files = caps.synthesize(&milestone, "").await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "src/api.ts");

        let report = caps.validate(&files).await.unwrap();
        assert!(report.passed);
        assert_eq!(caps.design("x", &[]).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_queued_responses_in_order() {
        let caps = ScriptedCapabilities::new()
            .with_files("a", vec![ProjectFile::new("one.ts", "1")])
            .with_files("a", vec![ProjectFile::new("two.ts", "2")])
            .with_report(ValidationReport::failed("nope"));
        let milestone = Milestone::new("a", "A");

        assert_eq!(caps.synthesize(&milestone, "").await.unwrap()[0].path, "one.ts");
        assert_eq!(caps.synthesize(&milestone, "ctx").await.unwrap()[0].path, "two.ts");
        assert!(!caps.validate(&[]).await.unwrap().passed);
        assert!(caps.validate(&[]).await.unwrap().passed);

        let contexts: Vec<_> = caps
            .calls_of(Stage::Synthesis)
            .into_iter()
            .map(|call| call.context)
            .collect();
        assert_eq!(contexts, vec!["", "ctx"]);
    }

    #[tokio::test]
    async fn test_failures() {
        let caps = ScriptedCapabilities::new()
            .failing(Stage::Planning, "quota exceeded")
            .failing_synthesis_of("b");

        assert!(caps.plan("x", &[]).await.is_err());
        assert!(caps.synthesize(&Milestone::new("a", "A"), "").await.is_ok());
        assert!(caps.synthesize(&Milestone::new("b", "B"), "").await.is_err());
        assert_eq!(caps.calls().len(), 3);
    }
}
