//! Plan generation and the build pipeline.
//!
//! Both hold the processing flag for their whole duration. The state lock is
//! taken only between capability calls, so observers can read progress while
//! a call is in flight.

use std::sync::Arc;

use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use super::{Orchestrator, ProjectEvent};
use crate::{
    capability::{Capabilities, Stage},
    error::{FactoryError, Result},
    models::{agent, Milestone, MilestoneStatus, Plan, ProjectFile, ProjectStatus, Severity, Visual},
    params::GeneratePlan,
};

/// Separator between the artifact context and validation feedback handed to
/// the corrective synthesis attempt.
pub const FEEDBACK_HEADER: &str = "\n\nPREVIOUS ATTEMPT FEEDBACK:\n";

/// Summary of one `execute` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Milestones run in this call, in order
    pub executed: Vec<String>,
    /// Milestones skipped because they were already done
    pub skipped: Vec<String>,
    /// Milestones whose first candidates failed validation
    pub corrected: Vec<String>,
    /// Artifacts appended in this call
    pub artifacts: usize,
    /// Whether a design visual was produced
    pub visual: bool,
}

impl RunReport {
    /// True when the call found nothing to do.
    pub fn is_noop(&self) -> bool {
        self.executed.is_empty() && !self.visual
    }
}

impl Orchestrator {
    /// Starts a new planning cycle from a prompt.
    ///
    /// Clears the undo history, the plan and the visuals (artifacts and logs
    /// are kept), then asks the planning capability for milestones. On
    /// failure the project is marked failed and the plan stays empty.
    pub async fn generate_plan(&self, params: &GeneratePlan) -> Result<Plan> {
        let prompt = params.prompt.trim().to_string();
        if prompt.is_empty() {
            return Err(FactoryError::invalid_input("prompt").with_reason("must not be empty"));
        }
        let capabilities = self.capabilities()?;
        let _guard = self.start_processing("generate a plan").await?;

        {
            let mut session = self.session.lock().await;
            session.history.clear();
            session.state.prompt = prompt.clone();
            session.state.plan = Plan::new();
            session.state.visuals.clear();
        }
        self.emit(ProjectEvent::PlanChanged);
        self.emit(ProjectEvent::HistoryChanged {
            can_undo: false,
            can_redo: false,
        });
        self.transition(ProjectStatus::Planning).await;
        self.log(agent::NOVA, "Initializing autonomous engineering pipeline...", Severity::Info)
            .await;
        self.log(agent::PLANNER, "Constructing dependency graph and roadmap...", Severity::Info)
            .await;
        self.persist_or_warn().await;

        let drafts = match capabilities.plan(&prompt, &params.images).await {
            Ok(drafts) => drafts,
            Err(e) => {
                error!("Planning failed: {e}");
                self.log(agent::SYSTEM, format!("Critical Planning Failure: {e}"), Severity::Error)
                    .await;
                self.transition(ProjectStatus::Failed).await;
                self.persist_or_warn().await;
                return Err(FactoryError::capability(Stage::Planning, e));
            }
        };

        let plan = Plan::from_drafts(drafts);
        self.session.lock().await.state.plan = plan.clone();
        self.emit(ProjectEvent::PlanChanged);
        if plan.is_empty() {
            self.log(agent::PLANNER, "The planner returned no milestones.", Severity::Warning)
                .await;
        } else {
            self.log(
                agent::PLANNER,
                "Architecture roadmap finalized. Review before execution.",
                Severity::Success,
            )
            .await;
        }
        self.transition(ProjectStatus::Idle).await;
        info!("Generated a plan of {} milestones", plan.len());
        self.persist().await?;
        Ok(plan)
    }

    /// Runs every milestone that is not yet done, in plan order, then the
    /// design pass.
    ///
    /// Each milestone is synthesized and validated; a failed validation
    /// triggers exactly one corrective synthesis whose output is appended
    /// next to the rejected candidates. The milestone ends `done` either way.
    /// A capability error aborts the run and marks the project failed. Work
    /// produced so far is kept, and the interrupted milestone stays `running`.
    pub async fn execute(&self) -> Result<RunReport> {
        let capabilities = self.capabilities()?;
        let _guard = self.start_processing("execute the plan").await?;

        let count = {
            let session = self.session.lock().await;
            let plan = &session.state.plan;
            if plan.is_empty() {
                return Err(FactoryError::invalid_input("plan")
                    .with_reason("nothing to execute; generate or add milestones first"));
            }
            if plan.is_complete() {
                info!("Every milestone is already done; nothing to execute");
                return Ok(RunReport::default());
            }
            plan.len()
        };

        self.transition(ProjectStatus::Coding).await;
        self.log(agent::NOVA, "Build sequence initiated.", Severity::Info).await;

        let mut report = RunReport::default();
        for index in 0..count {
            let next = self.session.lock().await.state.plan.milestones().get(index).cloned();
            let Some(milestone) = next else {
                let e = FactoryError::invalid_input("plan").with_reason("changed shape during the run");
                return Err(self.abort_run(e).await);
            };
            if milestone.is_done() {
                report.skipped.push(milestone.id);
                continue;
            }
            if let Err(e) = self.run_milestone(&capabilities, &milestone, &mut report).await {
                return Err(self.abort_run(e).await);
            }
        }

        self.transition(ProjectStatus::Designing).await;
        self.log(agent::DESIGNER, "Rendering system blueprints and visuals...", Severity::Info)
            .await;
        let (prompt, milestones) = {
            let session = self.session.lock().await;
            (
                session.state.prompt.clone(),
                session.state.plan.milestones().to_vec(),
            )
        };
        match capabilities.design(&prompt, &milestones).await {
            Ok(Some(markup)) => {
                let visual = Visual::diagram(Visual::BLUEPRINT_TITLE, markup);
                let title = visual.title.clone();
                self.session.lock().await.state.visuals.push(visual);
                self.emit(ProjectEvent::VisualAdded { title });
                report.visual = true;
            }
            Ok(None) => warn!("Design pass returned no markup"),
            Err(e) => {
                return Err(self.abort_run(FactoryError::capability(Stage::Design, e)).await)
            }
        }

        self.transition(ProjectStatus::Completed).await;
        self.log(
            agent::NOVA,
            "Project synthesis complete. All modules operational.",
            Severity::Success,
        )
        .await;
        self.persist().await?;
        Ok(report)
    }

    /// Synthesize, validate, self-correct once, mark done, persist.
    async fn run_milestone(
        &self,
        capabilities: &Arc<dyn Capabilities>,
        milestone: &Milestone,
        report: &mut RunReport,
    ) -> Result<()> {
        let context = {
            let mut session = self.session.lock().await;
            session.state.plan.set_status(&milestone.id, MilestoneStatus::Running)?;
            session.state.files_context()
        };
        self.emit(ProjectEvent::MilestoneStatusChanged {
            id: milestone.id.clone(),
            status: MilestoneStatus::Running,
        });
        self.transition(ProjectStatus::Coding).await;
        self.log(agent::CODER, format!("Synthesizing {}...", milestone.title), Severity::Info)
            .await;

        let candidates = capabilities
            .synthesize(milestone, &context)
            .await
            .map_err(|e| FactoryError::capability(Stage::Synthesis, e))?;

        self.transition(ProjectStatus::Testing).await;
        self.log(
            agent::TESTER,
            format!("Verifying integrity of {}...", milestone.title),
            Severity::Info,
        )
        .await;
        let verdict = capabilities
            .validate(&candidates)
            .await
            .map_err(|e| FactoryError::capability(Stage::Validation, e))?;

        let mut appended = self.append_files(candidates).await;
        if verdict.passed {
            self.log(
                agent::TESTER,
                format!("{} verified successfully.", milestone.title),
                Severity::Success,
            )
            .await;
        } else {
            self.log(
                agent::TESTER,
                format!(
                    "Validation failed: {}. Applying self-correction...",
                    verdict.feedback
                ),
                Severity::Warning,
            )
            .await;
            self.transition(ProjectStatus::Coding).await;
            let retry_context = format!("{context}{FEEDBACK_HEADER}{}", verdict.correction_notes());
            let corrected = capabilities
                .synthesize(milestone, &retry_context)
                .await
                .map_err(|e| FactoryError::capability(Stage::Synthesis, e))?;
            appended += self.append_files(corrected).await;
            report.corrected.push(milestone.id.clone());
        }

        self.session
            .lock()
            .await
            .state
            .plan
            .set_status(&milestone.id, MilestoneStatus::Done)?;
        self.emit(ProjectEvent::MilestoneStatusChanged {
            id: milestone.id.clone(),
            status: MilestoneStatus::Done,
        });
        report.executed.push(milestone.id.clone());
        report.artifacts += appended;
        self.persist_or_warn().await;
        Ok(())
    }

    async fn append_files(&self, files: Vec<ProjectFile>) -> usize {
        let count = files.len();
        if count > 0 {
            self.session.lock().await.state.files.extend(files);
            self.emit(ProjectEvent::FilesAdded { count });
        }
        count
    }

    /// Records a failed run and hands the error back for the caller. The
    /// in-flight milestone keeps its `running` status so a re-run picks it up.
    async fn abort_run(&self, e: FactoryError) -> FactoryError {
        error!("Run aborted: {e}");
        self.log(agent::SYSTEM, format!("Critical Build Error: {e}"), Severity::Error)
            .await;
        self.transition(ProjectStatus::Failed).await;
        self.persist_or_warn().await;
        e
    }

    /// Sets the overall status and announces it when it changed.
    async fn transition(&self, status: ProjectStatus) {
        let changed = {
            let mut session = self.session.lock().await;
            let changed = session.state.status != status;
            session.state.status = status;
            changed
        };
        if changed {
            self.emit(ProjectEvent::StatusChanged(status));
        }
    }
}
