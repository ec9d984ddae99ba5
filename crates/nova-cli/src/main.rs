//! Nova CLI Application
//!
//! Command-line front end for the Nova software factory.

mod args;
mod cli;
mod renderer;

use std::sync::Arc;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::{debug, info};
use nova_core::{
    Capabilities, GeminiCapabilities, GeminiConfig, OrchestratorBuilder, ScriptedCapabilities,
};
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        session,
        no_color,
        offline,
        command,
    } = Args::parse();

    let needs_capabilities = command.as_ref().is_some_and(Commands::needs_capabilities);
    let mut builder = OrchestratorBuilder::new().with_database_path(database_file);
    if let Some(key) = session {
        builder = builder.with_session_key(key);
    }
    if needs_capabilities {
        builder = builder.with_capabilities(capabilities(offline)?);
    }
    let orchestrator = builder
        .build()
        .await
        .context("Failed to initialize orchestrator")?;

    let cli = Cli::new(orchestrator, TerminalRenderer::new(!no_color));
    info!("Nova started");

    match command {
        Some(Plan { command }) => cli.handle_plan_command(command).await,
        Some(Milestone { command }) => cli.handle_milestone_command(command).await,
        Some(Undo) => cli.undo().await,
        Some(Redo) => cli.redo().await,
        Some(Files(args)) => cli.files(args).await,
        Some(Logs(args)) => cli.logs(args).await,
        Some(Preview(args)) => cli.preview(args).await,
        Some(Visuals(args)) => cli.visuals(args).await,
        Some(Status) | None => cli.status().await,
        Some(Reset(args)) => cli.reset(args).await,
    }
}

fn capabilities(offline: bool) -> Result<Arc<dyn Capabilities>> {
    if offline {
        debug!("Using offline capabilities");
        return Ok(Arc::new(ScriptedCapabilities::new()));
    }
    let config = GeminiConfig::from_env();
    let client = GeminiCapabilities::from_config(config)
        .context("The hosted model needs an API key; set GEMINI_API_KEY, or pass --offline")?;
    Ok(Arc::new(client))
}
