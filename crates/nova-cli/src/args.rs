//! Command-line argument definitions using clap.
//!
//! Argument structs carry the clap-specific attributes; each converts into
//! the interface-agnostic parameter type from `nova_core::params`:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Orchestrator
//! ```

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use nova_core::{
    params::{MoveMilestone, NewMilestone, SetStatus},
    MilestoneStatus,
};

/// Nova turns a prompt into a plan of milestones and builds it, milestone by
/// milestone, with hosted model agents for planning, coding, testing and
/// design.
#[derive(Parser)]
#[command(version, about, name = "nova")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/nova/nova.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Storage key of the session to work on
    #[arg(long, global = true)]
    pub session: Option<String>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Use canned offline capabilities instead of the hosted model
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate, inspect and run the plan
    #[command(alias = "p")]
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Edit individual milestones
    #[command(alias = "m")]
    Milestone {
        #[command(subcommand)]
        command: MilestoneCommands,
    },
    /// Undo the last plan edit
    Undo,
    /// Redo the last undone plan edit
    Redo,
    /// List generated files, or show one
    #[command(alias = "f")]
    Files(FilesArgs),
    /// Show the activity log
    #[command(alias = "l")]
    Logs(LogsArgs),
    /// Assemble the generated web files into one HTML page
    Preview(PreviewArgs),
    /// List or export rendered visuals
    Visuals(VisualsArgs),
    /// Show the project status
    Status,
    /// Clear the project and delete its stored session
    Reset(ResetArgs),
}

impl Commands {
    /// Whether the command calls out to the capabilities.
    pub fn needs_capabilities(&self) -> bool {
        matches!(
            self,
            Commands::Plan {
                command: PlanCommands::Generate(_) | PlanCommands::Run
            }
        )
    }
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Ask the planner for a new roadmap (clears the current plan)
    #[command(alias = "g")]
    Generate(GenerateArgs),
    /// Show the roadmap
    #[command(alias = "s")]
    Show,
    /// Lay out the roadmap with its dependency connectors
    Graph(GraphArgs),
    /// Execute every pending milestone, then render the blueprint
    #[command(alias = "r")]
    Run,
}

#[derive(ClapArgs)]
pub struct GenerateArgs {
    /// What to build
    pub prompt: String,
    /// Reference images (screenshots, sketches) sent to the planner
    #[arg(short, long = "image")]
    pub images: Vec<PathBuf>,
}

#[derive(ClapArgs)]
pub struct GraphArgs {
    /// Highlight the connectors of this milestone
    #[arg(long)]
    pub hover: Option<String>,
    /// Open the detail panel of this milestone
    #[arg(long)]
    pub expand: Option<String>,
    /// Container width in pixels
    #[arg(long, default_value_t = 896.0)]
    pub width: f64,
    /// Write the roadmap as SVG to this file
    #[arg(long)]
    pub svg: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum MilestoneCommands {
    /// Add a milestone to the end of the plan
    #[command(alias = "a")]
    Add(AddMilestoneArgs),
    /// Change a milestone's title, description, dependencies or status
    #[command(alias = "e")]
    Edit(EditMilestoneArgs),
    /// Remove a milestone and every reference to it
    #[command(aliases = ["d", "rm"])]
    Delete(DeleteMilestoneArgs),
    /// Move a milestone to another position
    #[command(alias = "mv")]
    Move(MoveMilestoneArgs),
    /// Override a milestone's status
    #[command(alias = "s")]
    Status(StatusArgs),
}

#[derive(ClapArgs)]
pub struct AddMilestoneArgs {
    /// Title of the milestone
    pub title: String,
    #[arg(short, long, help = "What the milestone should deliver")]
    pub description: Option<String>,
    #[arg(
        long = "depends-on",
        value_delimiter = ',',
        help = "IDs of milestones this one depends on, comma-separated"
    )]
    pub dependencies: Vec<String>,
    #[arg(long, help = "Explicit ID (generated when omitted)")]
    pub id: Option<String>,
}

impl From<AddMilestoneArgs> for NewMilestone {
    fn from(val: AddMilestoneArgs) -> Self {
        NewMilestone {
            id: val.id,
            title: val.title,
            description: val.description.unwrap_or_default(),
            dependencies: val.dependencies,
        }
    }
}

#[derive(ClapArgs)]
pub struct EditMilestoneArgs {
    /// ID of the milestone to edit
    pub id: String,
    #[arg(short, long, help = "New title")]
    pub title: Option<String>,
    #[arg(short, long, help = "New description")]
    pub description: Option<String>,
    #[arg(
        long = "depends-on",
        value_delimiter = ',',
        help = "Replacement dependency list, comma-separated (empty clears it)"
    )]
    pub dependencies: Option<Vec<String>>,
    #[arg(short, long, help = "New status")]
    pub status: Option<MilestoneStatusArg>,
}

#[derive(ClapArgs)]
pub struct DeleteMilestoneArgs {
    /// ID of the milestone to delete
    pub id: String,
}

#[derive(ClapArgs)]
pub struct MoveMilestoneArgs {
    /// Current 0-based position
    pub from: usize,
    /// Target 0-based position
    pub to: usize,
}

impl From<MoveMilestoneArgs> for MoveMilestone {
    fn from(val: MoveMilestoneArgs) -> Self {
        MoveMilestone {
            from: val.from,
            to: val.to,
        }
    }
}

#[derive(ClapArgs)]
pub struct StatusArgs {
    /// ID of the milestone
    pub id: String,
    /// New status
    pub status: MilestoneStatusArg,
}

impl From<StatusArgs> for SetStatus {
    fn from(val: StatusArgs) -> Self {
        SetStatus {
            id: val.id,
            status: val.status.into(),
        }
    }
}

#[derive(ClapArgs)]
pub struct FilesArgs {
    /// Show the newest revision of this file
    pub path: Option<String>,
}

#[derive(ClapArgs)]
pub struct LogsArgs {
    /// Number of entries to show, newest first
    #[arg(short = 'n', long, default_value_t = 20)]
    pub limit: usize,
}

#[derive(ClapArgs)]
pub struct PreviewArgs {
    /// Write the page to this file instead of printing it
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(ClapArgs)]
pub struct VisualsArgs {
    /// Export every visual into this directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(ClapArgs)]
pub struct ResetArgs {
    /// Confirm the reset (required to prevent accidental loss)
    #[arg(long)]
    pub confirm: bool,
}

/// Command-line spelling of milestone statuses.
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum MilestoneStatusArg {
    Pending,
    Running,
    Done,
    Failed,
}

impl From<MilestoneStatusArg> for MilestoneStatus {
    fn from(val: MilestoneStatusArg) -> Self {
        match val {
            MilestoneStatusArg::Pending => MilestoneStatus::Pending,
            MilestoneStatusArg::Running => MilestoneStatus::Running,
            MilestoneStatusArg::Done => MilestoneStatus::Done,
            MilestoneStatusArg::Failed => MilestoneStatus::Failed,
        }
    }
}
