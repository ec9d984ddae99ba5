//! Command handlers.
//!
//! [`Cli`] pairs the orchestrator with a renderer; each handler performs one
//! command and prints its outcome as markdown.

use std::{path::Path, time::Instant};

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use log::{info, warn};
use nova_core::{
    display::{Files, Logs, Visuals},
    layout::ConnectorState,
    params::{GeneratePlan, SetStatus},
    CreateResult, DeleteResult, LayoutEngine, MilestoneStatus, OperationStatus, Orchestrator,
    ProjectEvent, StatusBar, UpdateResult,
};
use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::{
    args::{
        EditMilestoneArgs, FilesArgs, GenerateArgs, GraphArgs, LogsArgs, MilestoneCommands,
        PlanCommands, PreviewArgs, ResetArgs, VisualsArgs,
    },
    renderer::TerminalRenderer,
};

pub struct Cli {
    orchestrator: Orchestrator,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(orchestrator: Orchestrator, renderer: TerminalRenderer) -> Self {
        Self {
            orchestrator,
            renderer,
        }
    }

    pub async fn handle_plan_command(&self, command: PlanCommands) -> Result<()> {
        match command {
            PlanCommands::Generate(args) => self.generate(args).await,
            PlanCommands::Show => {
                let state = self.orchestrator.state().await;
                self.renderer.render(&state.plan.to_string())
            }
            PlanCommands::Graph(args) => self.graph(args).await,
            PlanCommands::Run => self.run().await,
        }
    }

    pub async fn handle_milestone_command(&self, command: MilestoneCommands) -> Result<()> {
        match command {
            MilestoneCommands::Add(args) => {
                let milestone = self
                    .orchestrator
                    .add_milestone(&args.into())
                    .await
                    .context("Failed to add milestone")?;
                self.renderer.render(&CreateResult::new(milestone).to_string())
            }
            MilestoneCommands::Edit(args) => self.edit(args).await,
            MilestoneCommands::Delete(args) => {
                let removed = self
                    .orchestrator
                    .delete_milestone(&args.id)
                    .await
                    .with_context(|| format!("Failed to delete milestone '{}'", args.id))?;
                self.renderer.render(&DeleteResult::new(removed).to_string())
            }
            MilestoneCommands::Move(args) => {
                let moved = self
                    .orchestrator
                    .move_milestone(&args.into())
                    .await
                    .context("Failed to move milestone")?;
                if moved {
                    let state = self.orchestrator.state().await;
                    self.renderer.render(&state.plan.to_string())
                } else {
                    self.status_line(OperationStatus::warning("Milestone is already there"))
                }
            }
            MilestoneCommands::Status(args) => {
                let id = args.id.clone();
                let params: SetStatus = args.into();
                let previous = self
                    .orchestrator
                    .set_milestone_status(&params)
                    .await
                    .with_context(|| format!("Failed to update status of '{id}'"))?;
                self.status_line(OperationStatus::success(format!(
                    "Milestone '{id}': {previous} → {}",
                    params.status
                )))
            }
        }
    }

    pub async fn undo(&self) -> Result<()> {
        if self.orchestrator.undo().await.context("Failed to undo")? {
            let state = self.orchestrator.state().await;
            self.renderer.render(&state.plan.to_string())
        } else {
            self.status_line(OperationStatus::warning("Nothing to undo"))
        }
    }

    pub async fn redo(&self) -> Result<()> {
        if self.orchestrator.redo().await.context("Failed to redo")? {
            let state = self.orchestrator.state().await;
            self.renderer.render(&state.plan.to_string())
        } else {
            self.status_line(OperationStatus::warning("Nothing to redo"))
        }
    }

    pub async fn files(&self, args: FilesArgs) -> Result<()> {
        let state = self.orchestrator.state().await;
        match args.path {
            Some(path) => {
                let file = state
                    .file(&path)
                    .with_context(|| format!("No generated file at '{path}'"))?;
                self.renderer.render(&file.to_string())
            }
            None => self.renderer.render(&Files(state.files).to_string()),
        }
    }

    pub async fn logs(&self, args: LogsArgs) -> Result<()> {
        let state = self.orchestrator.state().await;
        let logs = Logs(state.logs.entries().to_vec()).latest(args.limit);
        if logs.is_empty() {
            return self.renderer.render(&logs.to_string());
        }
        for entry in &logs.0 {
            self.renderer.log_entry(entry);
        }
        Ok(())
    }

    pub async fn preview(&self, args: PreviewArgs) -> Result<()> {
        let state = self.orchestrator.state().await;
        let Some(page) = state.preview() else {
            bail!("No build detected: the agents have not generated an index.html file yet");
        };
        match args.output {
            Some(path) => {
                write_file(&path, &page)?;
                self.status_line(OperationStatus::success(format!(
                    "Preview written to {}",
                    path.display()
                )))
            }
            None => {
                self.renderer.raw(&page);
                Ok(())
            }
        }
    }

    pub async fn visuals(&self, args: VisualsArgs) -> Result<()> {
        let state = self.orchestrator.state().await;
        let Some(dir) = args.output else {
            return self.renderer.render(&Visuals(state.visuals).to_string());
        };
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
        for (index, visual) in state.visuals.iter().enumerate() {
            let extension = if visual.content.trim_start().starts_with("<svg") {
                "svg"
            } else {
                "html"
            };
            let path = dir.join(format!("{}-{}.{extension}", index + 1, slug(&visual.title)));
            write_file(&path, &visual.content)?;
            info!("Exported visual to {}", path.display());
        }
        self.status_line(OperationStatus::success(format!(
            "Exported {} visual(s) to {}",
            state.visuals.len(),
            dir.display()
        )))
    }

    pub async fn status(&self) -> Result<()> {
        let state = self.orchestrator.state().await;
        let bar = StatusBar {
            state: &state,
            can_undo: self.orchestrator.can_undo().await,
            can_redo: self.orchestrator.can_redo().await,
        };
        self.renderer.render(&bar.to_string())?;
        if !state.plan.is_empty() {
            self.renderer.render("\n")?;
            self.renderer.render(&state.plan.to_string())?;
        }
        Ok(())
    }

    pub async fn reset(&self, args: ResetArgs) -> Result<()> {
        if !args.confirm {
            bail!("Resetting clears the plan, files and logs. Re-run with --confirm to proceed");
        }
        self.orchestrator.reset().await.context("Failed to reset project")?;
        self.status_line(OperationStatus::success("Project reset"))
    }

    async fn generate(&self, args: GenerateArgs) -> Result<()> {
        let images = args
            .images
            .iter()
            .map(|path| encode_image(path))
            .collect::<Result<Vec<_>>>()?;
        let params = GeneratePlan {
            prompt: args.prompt,
            images,
        };
        let plan = self
            .follow_logs(self.orchestrator.generate_plan(&params))
            .await?
            .context("Planning failed")?;
        self.renderer.render(&plan.to_string())
    }

    async fn run(&self) -> Result<()> {
        let report = self
            .follow_logs(self.orchestrator.execute())
            .await?
            .context("Build failed")?;
        self.renderer.render(&report.to_string())
    }

    /// Drives `operation` while printing log entries as they are produced.
    /// Ctrl-C abandons the operation; progress persisted so far is kept.
    async fn follow_logs<F, T>(&self, operation: F) -> Result<T>
    where
        F: std::future::Future<Output = T>,
    {
        let mut events = self.orchestrator.subscribe();
        tokio::pin!(operation);
        let output = loop {
            tokio::select! {
                output = &mut operation => break output,
                event = events.recv() => self.print_event(event),
                _ = tokio::signal::ctrl_c() => {
                    warn!("Interrupted by user");
                    bail!("Interrupted");
                }
            }
        };
        loop {
            match events.try_recv() {
                Ok(event) => self.print_event(Ok(event)),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
        Ok(output)
    }

    fn print_event(&self, event: Result<ProjectEvent, broadcast::error::RecvError>) {
        match event {
            Ok(ProjectEvent::Logged(entry)) => self.renderer.log_entry(&entry),
            Ok(_) => {}
            Err(e) => warn!("Missed log events: {e}"),
        }
    }

    async fn edit(&self, args: EditMilestoneArgs) -> Result<()> {
        let state = self.orchestrator.state().await;
        let previous = state
            .plan
            .get(&args.id)
            .cloned()
            .with_context(|| format!("Milestone '{}' not found", args.id))?;

        let mut updated = previous.clone();
        if let Some(title) = args.title {
            updated.title = title;
        }
        if let Some(description) = args.description {
            updated.description = description;
        }
        if let Some(dependencies) = args.dependencies {
            updated.dependencies = dependencies.into_iter().filter(|d| !d.is_empty()).collect();
        }
        if let Some(status) = args.status {
            updated.status = MilestoneStatus::from(status);
        }
        if updated == previous {
            return self.status_line(OperationStatus::warning("Nothing to change"));
        }

        self.orchestrator
            .edit_milestone(updated.clone())
            .await
            .with_context(|| format!("Failed to edit milestone '{}'", args.id))?;
        self.renderer
            .render(&UpdateResult::between(&previous, updated).to_string())
    }

    async fn graph(&self, args: GraphArgs) -> Result<()> {
        let state = self.orchestrator.state().await;
        let plan = &state.plan;
        let mut engine = LayoutEngine::default();
        let now = Instant::now();
        engine.resize(args.width, plan, now);
        if let Some(id) = &args.expand {
            if !plan.contains(id) {
                bail!("Milestone '{id}' not found");
            }
            engine.toggle_expanded(id, plan, now);
        }
        engine.recompute(plan);
        engine.set_hovered(args.hover.as_deref(), plan);

        let mut out = String::new();
        out.push_str(&format!(
            "## Layout ({:.0} x {:.0})\n\n",
            engine.layout().width(),
            engine.layout().height()
        ));
        for (id, node) in engine.layout().iter() {
            out.push_str(&format!(
                "- `{id}` at ({:.0}, {:.0}), {:.0} x {:.0}\n",
                node.x, node.y, node.width, node.height
            ));
        }
        if !engine.connectors().is_empty() {
            out.push_str("\n## Connectors\n\n");
            for connector in engine.connectors() {
                let marker = match connector.state {
                    ConnectorState::Satisfied => "✓",
                    ConnectorState::Related => "➤",
                    ConnectorState::Default => "·",
                };
                out.push_str(&format!(
                    "- {marker} {} → {} ({})\n",
                    connector.from, connector.to, connector.state
                ));
            }
        }
        self.renderer.render(&out)?;

        if let Some(path) = args.svg {
            write_file(&path, &engine.render_svg(plan))?;
            self.status_line(OperationStatus::success(format!(
                "Roadmap written to {}",
                path.display()
            )))?;
        }
        Ok(())
    }

    fn status_line(&self, status: OperationStatus) -> Result<()> {
        self.renderer.render(&status.to_string())
    }
}

/// Reads an image file into a `data:` URL.
fn encode_image(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read image {}", path.display()))?;
    let mime = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    };
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Lower-case, dash-separated file name stem.
fn slug(title: &str) -> String {
    let slug = title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "visual".to_string()
    } else {
        slug
    }
}
